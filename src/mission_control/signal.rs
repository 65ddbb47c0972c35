use strum_macros::Display;

/// Close codes sent in the final frame of a subscriber channel.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum CloseCode {
    Normal,
    UnsupportedCommand,
    MalformedMessage,
    InternalError,
}

impl CloseCode {
    pub fn code(self) -> u16 {
        match self {
            CloseCode::Normal => 1000,
            CloseCode::UnsupportedCommand => 1003,
            CloseCode::MalformedMessage => 1007,
            CloseCode::InternalError => 1011,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            CloseCode::Normal => "session closed",
            CloseCode::UnsupportedCommand => "unrecognised command",
            CloseCode::MalformedMessage => "malformed message",
            CloseCode::InternalError => "vehicle-control service unreachable",
        }
    }
}

/// Why one task of a subscriber session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// The subscriber went away; nothing can be sent anymore.
    SubscriberGone,
    /// The session ends with a close frame carrying this code.
    Close(CloseCode),
}
