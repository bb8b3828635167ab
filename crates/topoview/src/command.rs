//! View commands and the undo stack.
//!
//! A [`Command`] switches one of the two view controls:
//!
//! - the **group** control decides whether nodes are shown individually or
//!   aggregated per group;
//! - the **assistant** control toggles the control-point overlay.
//!
//! Commands are executed against a [`CommandReceiver`] and recorded on a
//! [`CommandStack`], which supports undo and reset but no redo.

use std::{fmt, str::FromStr};

use log::debug;

/// Target state of a view control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusType {
    Individual,
    Aggregated,
    ControlPoint,
    NoAssistant,
}

impl StatusType {
    /// The control this status belongs to.
    pub fn controller(self) -> ControllerType {
        match self {
            Self::Individual | Self::Aggregated => ControllerType::Group,
            Self::ControlPoint | Self::NoAssistant => ControllerType::Assistant,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Aggregated => "aggregated",
            Self::ControlPoint => "control-point",
            Self::NoAssistant => "no-assistant",
        }
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "aggregated" => Ok(Self::Aggregated),
            "control-point" => Ok(Self::ControlPoint),
            "no-assistant" => Ok(Self::NoAssistant),
            _ => Err(format!(
                "invalid status `{s}`, valid values: individual, aggregated, control-point, no-assistant"
            )),
        }
    }
}

/// The two view controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerType {
    Group,
    Assistant,
}

impl ControllerType {
    /// Status the control starts in and returns to on reset.
    pub fn default_status(self) -> StatusType {
        match self {
            Self::Group => StatusType::Individual,
            Self::Assistant => StatusType::NoAssistant,
        }
    }
}

/// A selectable item of a view control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerItem {
    kind: ControllerType,
    status: StatusType,
    name: &'static str,
}

impl ControllerItem {
    const fn new(kind: ControllerType, status: StatusType, name: &'static str) -> Self {
        Self { kind, status, name }
    }

    /// Returns the item selecting `status`.
    pub fn for_status(status: StatusType) -> &'static ControllerItem {
        match status {
            StatusType::Aggregated => &GROUP_ITEMS[0],
            StatusType::Individual => &GROUP_ITEMS[1],
            StatusType::ControlPoint => &ASSISTANT_ITEMS[0],
            StatusType::NoAssistant => &ASSISTANT_ITEMS[1],
        }
    }

    pub fn kind(&self) -> ControllerType {
        self.kind
    }

    pub fn status(&self) -> StatusType {
        self.status
    }

    /// Display name of the item.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Items of the group control.
pub static GROUP_ITEMS: [ControllerItem; 2] = [
    ControllerItem::new(ControllerType::Group, StatusType::Aggregated, "Group by ISP"),
    ControllerItem::new(ControllerType::Group, StatusType::Individual, "No Grouping"),
];

/// Items of the assistant control.
pub static ASSISTANT_ITEMS: [ControllerItem; 2] = [
    ControllerItem::new(
        ControllerType::Assistant,
        StatusType::ControlPoint,
        "Display Control Points",
    ),
    ControllerItem::new(
        ControllerType::Assistant,
        StatusType::NoAssistant,
        "No Assistant Items Displaying",
    ),
];

/// Receives the effects of executed commands.
pub trait CommandReceiver {
    /// Switches between individual and aggregated nodes.
    fn group_nodes(&mut self, item: &ControllerItem);

    /// Shows or hides the assistant overlay.
    fn render_assistant_items(&mut self, item: &ControllerItem);
}

type Action = fn(&mut dyn CommandReceiver, &ControllerItem);

fn group_nodes(receiver: &mut dyn CommandReceiver, item: &ControllerItem) {
    receiver.group_nodes(item);
}

fn render_assistant_items(receiver: &mut dyn CommandReceiver, item: &ControllerItem) {
    receiver.render_assistant_items(item);
}

/// Receiver callback per status.
const ACTIONS: [(StatusType, Action); 4] = [
    (StatusType::Individual, group_nodes),
    (StatusType::Aggregated, group_nodes),
    (StatusType::ControlPoint, render_assistant_items),
    (StatusType::NoAssistant, render_assistant_items),
];

/// A recorded switch of one view control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    status: StatusType,
}

impl Command {
    pub fn new(status: StatusType) -> Self {
        Self { status }
    }

    pub fn status(&self) -> StatusType {
        self.status
    }

    pub fn item(&self) -> &'static ControllerItem {
        ControllerItem::for_status(self.status)
    }

    pub fn kind(&self) -> ControllerType {
        self.status.controller()
    }

    /// Applies the command to `receiver`.
    pub fn execute(&self, receiver: &mut dyn CommandReceiver) {
        let item = self.item();
        if let Some((_, action)) = ACTIONS.iter().find(|(status, _)| *status == self.status) {
            debug!(status = self.status.as_str(), item = item.name(); "Executing command");
            action(receiver, item);
        }
    }
}

/// History of executed commands, most recent first.
///
/// # Examples
///
/// ```
/// use topoview::command::{CommandReceiver, CommandStack, ControllerItem, StatusType};
///
/// #[derive(Default)]
/// struct Flags {
///     aggregated: bool,
/// }
///
/// impl CommandReceiver for Flags {
///     fn group_nodes(&mut self, item: &ControllerItem) {
///         self.aggregated = item.status() == StatusType::Aggregated;
///     }
///
///     fn render_assistant_items(&mut self, _item: &ControllerItem) {}
/// }
///
/// let mut flags = Flags::default();
/// let mut stack = CommandStack::new();
///
/// stack.execute(StatusType::Aggregated, &mut flags);
/// assert!(flags.aggregated);
/// assert_eq!(stack.undo_label(), "Undo (1)");
///
/// stack.undo(&mut flags);
/// assert!(!flags.aggregated);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandStack {
    commands: Vec<Command>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes the command for `status` and records it.
    pub fn execute(&mut self, status: StatusType, receiver: &mut dyn CommandReceiver) {
        let command = Command::new(status);
        command.execute(receiver);
        self.commands.push(command);
    }

    /// Removes the most recent command and restores the state before it.
    ///
    /// The grouping is restored to the most recent remaining grouping
    /// command, or to individual nodes when none is left. Undoing an
    /// assistant command also hides the assistant overlay.
    ///
    /// Returns `None` without touching `receiver` if the stack is empty.
    pub fn undo(&mut self, receiver: &mut dyn CommandReceiver) -> Option<Command> {
        let command = self.commands.pop()?;
        debug!(status = command.status.as_str(), remaining = self.commands.len(); "Undoing command");

        let grouping = self.latest_of(ControllerType::Group);
        match command.kind() {
            ControllerType::Assistant => {
                if let Some(grouping) = grouping {
                    grouping.execute(receiver);
                }
                Command::new(ControllerType::Assistant.default_status()).execute(receiver);
            }
            ControllerType::Group => {
                grouping
                    .unwrap_or_else(|| Command::new(ControllerType::Group.default_status()))
                    .execute(receiver);
            }
        }

        Some(command)
    }

    /// Clears the history and restores both controls to their defaults.
    pub fn reset(&mut self, receiver: &mut dyn CommandReceiver) {
        debug!(discarded = self.commands.len(); "Resetting command stack");
        self.commands.clear();
        Command::new(ControllerType::Group.default_status()).execute(receiver);
        Command::new(ControllerType::Assistant.default_status()).execute(receiver);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The most recently executed command.
    pub fn latest(&self) -> Option<Command> {
        self.commands.last().copied()
    }

    /// Iterates from the most recent command to the oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().rev()
    }

    /// Label of the undo button.
    pub fn undo_label(&self) -> String {
        format!("Undo ({})", self.commands.len())
    }

    fn latest_of(&self, kind: ControllerType) -> Option<Command> {
        self.iter().find(|command| command.kind() == kind).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingReceiver {
        calls: Vec<(ControllerType, StatusType)>,
    }

    impl CommandReceiver for RecordingReceiver {
        fn group_nodes(&mut self, item: &ControllerItem) {
            self.calls.push((ControllerType::Group, item.status()));
        }

        fn render_assistant_items(&mut self, item: &ControllerItem) {
            self.calls.push((ControllerType::Assistant, item.status()));
        }
    }

    #[test]
    fn test_status_mapping() {
        let mut receiver = RecordingReceiver::default();
        Command::new(StatusType::Aggregated).execute(&mut receiver);
        Command::new(StatusType::Individual).execute(&mut receiver);
        Command::new(StatusType::ControlPoint).execute(&mut receiver);
        Command::new(StatusType::NoAssistant).execute(&mut receiver);

        assert_eq!(
            receiver.calls,
            [
                (ControllerType::Group, StatusType::Aggregated),
                (ControllerType::Group, StatusType::Individual),
                (ControllerType::Assistant, StatusType::ControlPoint),
                (ControllerType::Assistant, StatusType::NoAssistant),
            ]
        );
    }

    #[test]
    fn test_item_names() {
        assert_eq!(Command::new(StatusType::Aggregated).item().name(), "Group by ISP");
        assert_eq!(Command::new(StatusType::Individual).item().name(), "No Grouping");
        assert_eq!(
            Command::new(StatusType::ControlPoint).item().name(),
            "Display Control Points"
        );
        assert_eq!(
            Command::new(StatusType::NoAssistant).item().name(),
            "No Assistant Items Displaying"
        );
        assert_eq!(Command::new(StatusType::NoAssistant).kind(), ControllerType::Assistant);
    }

    #[test]
    fn test_every_status_has_its_own_item() {
        for status in [
            StatusType::Individual,
            StatusType::Aggregated,
            StatusType::ControlPoint,
            StatusType::NoAssistant,
        ] {
            let item = ControllerItem::for_status(status);
            assert_eq!(item.status(), status);
            assert_eq!(item.kind(), status.controller());
        }
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut receiver = RecordingReceiver::default();
        let mut stack = CommandStack::new();

        assert_eq!(stack.undo(&mut receiver), None);
        assert!(receiver.calls.is_empty());
    }

    #[test]
    fn test_undo_grouping_restores_default() {
        let mut receiver = RecordingReceiver::default();
        let mut stack = CommandStack::new();
        stack.execute(StatusType::Aggregated, &mut receiver);
        receiver.calls.clear();

        let undone = stack.undo(&mut receiver);

        assert_eq!(undone, Some(Command::new(StatusType::Aggregated)));
        assert_eq!(receiver.calls, [(ControllerType::Group, StatusType::Individual)]);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_undo_grouping_restores_previous_grouping() {
        let mut receiver = RecordingReceiver::default();
        let mut stack = CommandStack::new();
        stack.execute(StatusType::Aggregated, &mut receiver);
        stack.execute(StatusType::ControlPoint, &mut receiver);
        stack.execute(StatusType::Individual, &mut receiver);
        receiver.calls.clear();

        stack.undo(&mut receiver);

        assert_eq!(receiver.calls, [(ControllerType::Group, StatusType::Aggregated)]);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_undo_assistant_restores_grouping_and_hides_overlay() {
        let mut receiver = RecordingReceiver::default();
        let mut stack = CommandStack::new();
        stack.execute(StatusType::Aggregated, &mut receiver);
        stack.execute(StatusType::ControlPoint, &mut receiver);
        receiver.calls.clear();

        stack.undo(&mut receiver);

        assert_eq!(
            receiver.calls,
            [
                (ControllerType::Group, StatusType::Aggregated),
                (ControllerType::Assistant, StatusType::NoAssistant),
            ]
        );
    }

    #[test]
    fn test_undo_assistant_without_grouping() {
        let mut receiver = RecordingReceiver::default();
        let mut stack = CommandStack::new();
        stack.execute(StatusType::ControlPoint, &mut receiver);
        receiver.calls.clear();

        stack.undo(&mut receiver);

        assert_eq!(receiver.calls, [(ControllerType::Assistant, StatusType::NoAssistant)]);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut receiver = RecordingReceiver::default();
        let mut stack = CommandStack::new();
        stack.execute(StatusType::Aggregated, &mut receiver);
        stack.execute(StatusType::ControlPoint, &mut receiver);
        receiver.calls.clear();

        stack.reset(&mut receiver);

        assert!(stack.is_empty());
        assert_eq!(stack.undo_label(), "Undo (0)");
        assert_eq!(
            receiver.calls,
            [
                (ControllerType::Group, StatusType::Individual),
                (ControllerType::Assistant, StatusType::NoAssistant),
            ]
        );
    }

    #[test]
    fn test_iteration_is_most_recent_first() {
        let mut receiver = RecordingReceiver::default();
        let mut stack = CommandStack::new();
        stack.execute(StatusType::Aggregated, &mut receiver);
        stack.execute(StatusType::ControlPoint, &mut receiver);

        let statuses: Vec<StatusType> = stack.iter().map(Command::status).collect();
        assert_eq!(statuses, [StatusType::ControlPoint, StatusType::Aggregated]);
        assert_eq!(stack.latest(), Some(Command::new(StatusType::ControlPoint)));
        assert_eq!(stack.undo_label(), "Undo (2)");
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("control-point".parse(), Ok(StatusType::ControlPoint));
        assert_eq!(StatusType::NoAssistant.to_string(), "no-assistant");
        assert!("grouped".parse::<StatusType>().is_err());
    }
}
