/// Change notification for a watched file or entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileEvent {
    FolderCreated,
    FileCreated,
    Changed,
    Deleted,
    Renamed,
    AttributeChanged,
}

impl FileEvent {
    /// Whether the event may change what the file declares.
    /// Attribute-only changes (permissions, timestamps) never do.
    pub fn invalidates(self) -> bool {
        !matches!(self, FileEvent::AttributeChanged)
    }
}
