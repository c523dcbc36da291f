/// A fully addressed message ready for the transport.
///
/// `From`, `Sender` and `Reply-To` always carry the same address. The body
/// is delivered byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub recipient: String,
    pub sender: String,
    pub subject: String,
    pub body: Vec<u8>,
}

impl OutgoingMail {
    pub fn new(
        recipient: impl Into<String>,
        sender: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            sender: sender.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Header fields in the order they are written.
    pub fn headers(&self) -> [(&'static str, &str); 4] {
        [
            ("From", self.sender.as_str()),
            ("Sender", self.sender.as_str()),
            ("Reply-To", self.sender.as_str()),
            ("Subject", self.subject.as_str()),
        ]
    }
}
