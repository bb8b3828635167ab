//! Interactive view state of a topology.
//!
//! [`TopologyView`] ties the source topology to everything the user can
//! change about its presentation: grouping, the control-point overlay,
//! collapsed nodes and the zoom/pan transform. It receives the effects of
//! the command stack it owns, so [`TopologyView::apply`],
//! [`TopologyView::undo`] and [`TopologyView::reset`] keep history and state
//! in step.

use std::collections::HashSet;

use log::{debug, info};

use topoview_core::{
    geometry::{Point, Transform},
    identifier::Id,
    topology::Topology,
};

use crate::{
    aggregate,
    command::{Command, CommandReceiver, CommandStack, ControllerItem, StatusType},
    config::{AppConfig, GroupingMode, LayoutConfig},
    layout::{LayoutEngine, TreeLayout},
    tree::{TopologyTree, TreeError},
};

/// Entries of the control-bar legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlType {
    /// Toggles group aggregation.
    Aggregation,
    /// Toggles the control-point overlay.
    ControlPoint,
}

impl ControlType {
    /// Legend title of the control.
    pub fn title(self) -> &'static str {
        match self {
            Self::Aggregation => "Group Aggregation",
            Self::ControlPoint => "Show Control Points",
        }
    }
}

/// The current presentation of a topology.
///
/// # Examples
///
/// ```
/// use topoview::{
///     config::{AppConfig, GroupingMode},
///     identifier::Id,
///     topology::{Node, Topology},
///     view::{ControlType, TopologyView},
/// };
///
/// let mut topology = Topology::new();
/// topology.add_node(Node::new(Id::new("a"), "A", 1));
/// topology.add_node(Node::new(Id::new("b"), "B", 2));
/// topology.add_edge(Id::new("a"), Id::new("b"));
///
/// let mut view = TopologyView::new(topology, &AppConfig::default());
/// view.control(ControlType::Aggregation);
///
/// assert_eq!(view.grouping(), GroupingMode::Aggregated);
/// assert_eq!(view.layout().len(), 2);
///
/// view.undo();
/// assert_eq!(view.grouping(), GroupingMode::Individual);
/// ```
#[derive(Debug, Clone)]
pub struct TopologyView {
    topology: Topology,
    tree: TopologyTree,
    layout_config: LayoutConfig,
    grouping: GroupingMode,
    control_points: bool,
    collapsed: HashSet<Id>,
    transform: Transform,
    min_zoom: f32,
    max_zoom: f32,
    commands: CommandStack,
}

impl TopologyView {
    /// Creates a view of `topology` in the initial state from `config`.
    pub fn new(topology: Topology, config: &AppConfig) -> Self {
        let view_config = config.view();
        let mut view = Self {
            tree: TopologyTree::default(),
            topology,
            layout_config: config.layout().clone(),
            grouping: view_config.grouping(),
            control_points: view_config.control_points(),
            collapsed: HashSet::new(),
            transform: Transform::identity(),
            min_zoom: view_config.min_zoom(),
            max_zoom: view_config.max_zoom(),
            commands: CommandStack::new(),
        };
        view.rebuild_tree();
        view
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The tree currently shown, aggregated or not.
    pub fn tree(&self) -> &TopologyTree {
        &self.tree
    }

    pub fn grouping(&self) -> GroupingMode {
        self.grouping
    }

    pub fn shows_control_points(&self) -> bool {
        self.control_points
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn commands(&self) -> &CommandStack {
        &self.commands
    }

    /// Whether the legend entry of `control` is highlighted, i.e. its
    /// option is active.
    pub fn is_highlighted(&self, control: ControlType) -> bool {
        match control {
            ControlType::Aggregation => self.grouping == GroupingMode::Aggregated,
            ControlType::ControlPoint => self.control_points,
        }
    }

    /// Ids of nodes that stay collapsed across tree rebuilds.
    pub fn collapsed(&self) -> impl Iterator<Item = Id> + '_ {
        self.collapsed.iter().copied()
    }

    /// Executes the command for `status` and records it.
    pub fn apply(&mut self, status: StatusType) {
        self.with_commands(|commands, view| commands.execute(status, view));
    }

    /// Undoes the most recent command. Returns `None` if there is none.
    pub fn undo(&mut self) -> Option<Command> {
        self.with_commands(|commands, view| commands.undo(view))
    }

    /// Clears the history and restores the default grouping and overlay.
    pub fn reset(&mut self) {
        self.with_commands(|commands, view| commands.reset(view));
    }

    /// Flips the option behind a legend entry, recording it as a command.
    pub fn control(&mut self, control: ControlType) {
        let status = match control {
            ControlType::Aggregation => self.grouping.toggled().status(),
            ControlType::ControlPoint if self.control_points => StatusType::NoAssistant,
            ControlType::ControlPoint => StatusType::ControlPoint,
        };
        self.apply(status);
    }

    /// Collapses or expands `id`. Returns whether the tree changed.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `id` is not in the current tree.
    pub fn toggle_node(&mut self, id: Id) -> Result<bool, TreeError> {
        let changed = self.tree.toggle(id)?;
        if self.tree.get(id).is_some_and(|node| node.is_collapsed()) {
            self.collapsed.insert(id);
        } else {
            self.collapsed.remove(&id);
        }
        debug!(node = id.to_string(), changed; "Node toggled");
        Ok(changed)
    }

    /// Zooms by `factor` around the screen point `anchor`.
    ///
    /// The resulting scale stays within the configured zoom limits.
    pub fn zoom_by(&mut self, factor: f32, anchor: Point) {
        self.transform = self
            .transform
            .zoom_at(factor, anchor, self.min_zoom, self.max_zoom);
        debug!(scale = self.transform.scale(); "Zoomed");
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.pan(Point::new(dx, dy));
    }

    /// Replaces the transform, clamping its scale to the zoom limits.
    pub fn set_transform(&mut self, transform: Transform) {
        let scale = transform.scale().clamp(self.min_zoom, self.max_zoom);
        self.transform = Transform::new(transform.translate(), scale);
    }

    pub fn reset_zoom(&mut self) {
        self.transform = Transform::identity();
    }

    /// Lays out the currently visible tree.
    pub fn layout(&self) -> TreeLayout {
        LayoutEngine::new(&self.layout_config).calculate(&self.tree)
    }

    fn with_commands<R>(&mut self, f: impl FnOnce(&mut CommandStack, &mut Self) -> R) -> R {
        let mut commands = std::mem::take(&mut self.commands);
        let result = f(&mut commands, self);
        self.commands = commands;
        result
    }

    fn set_grouping(&mut self, grouping: GroupingMode) {
        if self.grouping == grouping {
            return;
        }
        self.grouping = grouping;
        self.rebuild_tree();
    }

    fn rebuild_tree(&mut self) {
        self.tree = match self.grouping {
            GroupingMode::Individual => TopologyTree::from_topology(&self.topology),
            GroupingMode::Aggregated => TopologyTree::from_topology(&aggregate::aggregate(&self.topology)),
        };

        let mut restored = 0;
        for &id in &self.collapsed {
            if let Ok(true) = self.tree.collapse(id) {
                restored += 1;
            }
        }

        info!(
            grouping:? = self.grouping,
            nodes = self.tree.len(),
            restored;
            "Tree rebuilt"
        );
    }
}

impl CommandReceiver for TopologyView {
    fn group_nodes(&mut self, item: &ControllerItem) {
        let grouping = match item.status() {
            StatusType::Aggregated => GroupingMode::Aggregated,
            _ => GroupingMode::Individual,
        };
        self.set_grouping(grouping);
    }

    fn render_assistant_items(&mut self, item: &ControllerItem) {
        self.control_points = item.status() == StatusType::ControlPoint;
        debug!(control_points = self.control_points; "Assistant items switched");
    }
}
