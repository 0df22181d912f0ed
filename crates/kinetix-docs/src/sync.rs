//! View synchronization: scroll-spy and fragment routing
//!
//! The synchronizer owns no platform hooks. An adapter feeds it scroll and
//! navigation events; it updates the sidebar flags and answers with the
//! [`ViewCommand`]s the adapter must carry out.

use crate::anchor::{Anchor, CHANGELOG_FRAGMENT};
use crate::registry::Registry;
use crate::sidebar::SidebarTree;

/// What the main content area is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Documentation,
    Changelog,
}

/// The single active navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveTarget {
    Anchor(Anchor),
    Changelog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Side effects requested from the adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    /// Replace the documentation flow with the changelog view
    ShowChangelog,
    /// Put the documentation flow back after the changelog view
    RestoreDocumentation,
    /// Scroll the content area to the element matching `selector`
    ScrollTo {
        selector: String,
        behavior: ScrollBehavior,
    },
    /// Scroll the sidebar so the link for `anchor` is in view
    RevealSidebarLink { anchor: Anchor },
}

/// One intersection observer record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry {
    /// Element id of the observed heading
    pub id: String,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn entered(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_intersecting: true,
        }
    }

    pub fn left(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_intersecting: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewSynchronizer {
    mode: ViewMode,
    active: Option<ActiveTarget>,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn active(&self) -> Option<&ActiveTarget> {
        self.active.as_ref()
    }

    /// Make `anchor` the active target and sync the sidebar to it
    ///
    /// Running it again for the same anchor leaves the same state.
    pub fn activate_anchor(&mut self, tree: &mut SidebarTree, anchor: &Anchor) -> Vec<ViewCommand> {
        self.active = Some(ActiveTarget::Anchor(anchor.clone()));
        if tree.activate(anchor) {
            vec![ViewCommand::RevealSidebarLink {
                anchor: anchor.clone(),
            }]
        } else {
            tracing::trace!(anchor = %anchor, "no sidebar link for active anchor");
            Vec::new()
        }
    }

    /// A heading crossed into the top region of the viewport
    pub fn on_scroll_anchor_entered(&mut self, tree: &mut SidebarTree, id: &str) -> Vec<ViewCommand> {
        if self.mode == ViewMode::Changelog {
            return Vec::new();
        }
        match Anchor::parse(id) {
            Some(anchor) => self.activate_anchor(tree, &anchor),
            None => Vec::new(),
        }
    }

    /// Batch form of [`Self::on_scroll_anchor_entered`]; exits are ignored
    pub fn on_intersection(
        &mut self,
        tree: &mut SidebarTree,
        entries: &[IntersectionEntry],
    ) -> Vec<ViewCommand> {
        entries
            .iter()
            .filter(|entry| entry.is_intersecting)
            .flat_map(|entry| self.on_scroll_anchor_entered(tree, &entry.id))
            .collect()
    }

    /// The location fragment changed
    pub fn on_fragment_changed(
        &mut self,
        tree: &mut SidebarTree,
        registry: &Registry,
        fragment: &str,
    ) -> Vec<ViewCommand> {
        self.navigate(tree, registry, fragment, ScrollBehavior::Smooth)
    }

    /// First navigation after startup
    ///
    /// Behaves like a fragment change with an instant scroll. Without a
    /// fragment the landing page, when given and registered, is shown.
    pub fn on_initial_load(
        &mut self,
        tree: &mut SidebarTree,
        registry: &Registry,
        fragment: Option<&str>,
        landing_page: Option<&str>,
    ) -> Vec<ViewCommand> {
        let fragment = fragment
            .map(|f| f.trim_start_matches('#'))
            .filter(|f| !f.is_empty());

        match (fragment, landing_page) {
            (Some(fragment), _) => self.navigate(tree, registry, fragment, ScrollBehavior::Instant),
            (None, Some(landing)) => self.navigate(tree, registry, landing, ScrollBehavior::Instant),
            (None, None) => Vec::new(),
        }
    }

    fn navigate(
        &mut self,
        tree: &mut SidebarTree,
        registry: &Registry,
        fragment: &str,
        behavior: ScrollBehavior,
    ) -> Vec<ViewCommand> {
        let fragment = fragment.trim_start_matches('#');
        if fragment == CHANGELOG_FRAGMENT {
            self.mode = ViewMode::Changelog;
            self.active = Some(ActiveTarget::Changelog);
            tree.activate_changelog();
            return vec![ViewCommand::ShowChangelog];
        }

        let mut commands = Vec::new();
        if self.mode == ViewMode::Changelog {
            self.mode = ViewMode::Documentation;
            if self.active == Some(ActiveTarget::Changelog) {
                self.active = None;
                tree.clear_active();
            }
            commands.push(ViewCommand::RestoreDocumentation);
        }

        let Some(anchor) = Anchor::parse(fragment) else {
            return commands;
        };
        if !registry.has_anchor(&anchor) {
            tracing::debug!(fragment, "navigation target not found");
            return commands;
        }

        commands.push(ViewCommand::ScrollTo {
            selector: anchor.selector(),
            behavior,
        });
        commands.extend(self.activate_anchor(tree, &anchor));
        commands
    }
}
