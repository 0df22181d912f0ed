//! Test fixtures for the documentation engine
//!
//! Small hand-written corpora shared by unit tests, integration tests and
//! benchmarks.

use crate::changelog::{Changelog, ChangelogEntry};
use crate::content::{GroupRecord, MethodRecord, PageRecord, PropertyRecord, SignalRecord, Status};
use crate::registry::Registry;

/// One page, `math`, under Libraries/Core with a single `sqrt` method
pub fn math_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(
        "math",
        PageRecord::new("Math", ["Libraries", "Core"])
            .with_method(MethodRecord::new("sqrt", "float", "(x: float)")),
    );
    registry
}

/// A small corpus spanning every prioritized category root
pub fn sample_registry() -> Registry {
    let mut registry = Registry::new();

    registry.register(
        "intro",
        PageRecord::new("Introduction", "Manual")
            .with_order(1)
            .with_description("<p>Welcome to Kinetix.</p><pre><code>let x = 1</code></pre>"),
    );
    registry.register(
        "syntax_basics",
        PageRecord::new("Syntax Basics", "Manual/Syntax").with_order(1),
    );
    registry.register(
        "syntax_symbols",
        PageRecord::new("Operators and Symbols", "Manual/Syntax").with_order(2),
    );

    registry.register(
        "math",
        PageRecord::new("Math", "Libraries/Core")
            .with_method(
                MethodRecord::new("sqrt", "float", "(x: float)")
                    .with_desc("Square root")
                    .with_example("math.sqrt(16.0)"),
            )
            .with_method(MethodRecord::new("sin", "float", "(x: float)").with_desc("Sine of an angle"))
            .with_method(MethodRecord::new("abs", "float", "(x: float)").with_desc("Absolute value")),
    );
    registry.register(
        "system",
        PageRecord::new("System", "Libraries/Core").with_method(
            MethodRecord::new("cpu_usage", "float", "()")
                .with_desc("CPU load as a percentage")
                .with_status(Status {
                    implemented: Some("v0.0.1".to_string()),
                    ..Status::default()
                }),
        ),
    );
    registry.register(
        "game",
        PageRecord::new("Game", "Libraries/Multimedia")
            .with_method(MethodRecord::new("init", "void", "(w: int, h: int)").with_desc("Open the game window"))
            .with_group(
                GroupRecord::new("Input").with_method(
                    MethodRecord::new("key_down", "bool", "(key: Key)").with_desc("Whether a key is held"),
                ),
            )
            .with_property(PropertyRecord::new("fps", "int", "60").with_desc("Target frame rate"))
            .with_signal(SignalRecord::new("on_collision", "(body: Body)").with_desc("Two bodies touched")),
    );

    registry.register(
        "windows",
        PageRecord::new("Windows", "OS Specific").with_method(
            MethodRecord::new("message_box", "void", "(text: String)").with_status(Status {
                unimplemented: Some("Planned".to_string()),
                ..Status::default()
            }),
        ),
    );

    registry
}

/// Two releases, newest first
pub fn sample_changelog() -> Changelog {
    vec![
        ChangelogEntry::new("v0.0.2", "2026-02-17")
            .with_change("Terminal module")
            .with_change("Offline documentation"),
        ChangelogEntry::new("v0.0.1", "2026-01-10").with_change("First release"),
    ]
    .into_iter()
    .collect()
}

/// A snippet touching every token class, for highlighter benchmarks
pub const SAMPLE_SNIPPET: &str = r#"// Integrate a falling body
fn step(body: Body, dt: float) -> Vector3 {
    let g = Vector3(0.0, -9.81, 0.0);
    /* semi-implicit Euler */
    body.velocity += g * dt;
    if body.position.y <= 0.0 && !body.resting {
        print!("bounce at {}", math.sqrt(body.velocity.y * body.velocity.y));
    }
    return [body.position, body.velocity][0];
}
"#;
