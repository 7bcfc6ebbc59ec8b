//! Message records delivered by the client library.
//!
//! The records mirror the library's own structures: optional strings travel
//! with a separate length field, and a string only counts as present when that
//! length is positive. Use the accessor methods rather than the raw fields to
//! get that check.

use std::fmt;

/// A message number packing layer, origin, severity and number into one
/// 32-bit value, one byte each from most to least significant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MsgNumber(pub i32);

impl MsgNumber {
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn pack(layer: u8, origin: u8, severity: u8, number: u8) -> Self {
        let raw = (u32::from(layer) << 24)
            | (u32::from(origin) << 16)
            | (u32::from(severity) << 8)
            | u32::from(number);
        Self(raw as i32)
    }

    #[must_use]
    pub fn layer(self) -> i32 {
        (self.0 >> 24) & 0xff
    }

    #[must_use]
    pub fn origin(self) -> i32 {
        (self.0 >> 16) & 0xff
    }

    #[must_use]
    pub fn severity(self) -> i32 {
        (self.0 >> 8) & 0xff
    }

    #[must_use]
    pub fn number(self) -> i32 {
        self.0 & 0xff
    }
}

impl From<i32> for MsgNumber {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for MsgNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MsgNumber")
            .field("layer", &self.layer())
            .field("origin", &self.origin())
            .field("severity", &self.severity())
            .field("number", &self.number())
            .finish()
    }
}

fn guarded(text: &str, len: i32) -> Option<&str> {
    let len = usize::try_from(len).ok().filter(|len| *len > 0)?;
    let mut end = len.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    Some(&text[..end])
}

/// A context-scoped message from the common library layer.
///
/// Only the packed `msgnumber` carries classification here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMessage {
    pub msgnumber: MsgNumber,
    pub msgstring: String,
    pub osstring: String,
    pub osstringlen: i32,
}

impl ContextMessage {
    #[must_use]
    pub fn new(msgnumber: impl Into<MsgNumber>, msgstring: impl Into<String>) -> Self {
        Self {
            msgnumber: msgnumber.into(),
            msgstring: msgstring.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_os_error(mut self, osstring: impl Into<String>) -> Self {
        self.osstring = osstring.into();
        self.osstringlen = i32::try_from(self.osstring.len()).unwrap_or(i32::MAX);
        self
    }

    #[must_use]
    pub fn os_error(&self) -> Option<&str> {
        guarded(&self.osstring, self.osstringlen)
    }
}

/// A condition detected by the client library on a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMessage {
    pub severity: i32,
    pub msgnumber: MsgNumber,
    pub msgstring: String,
    pub osnumber: i32,
    pub osstring: String,
    pub osstringlen: i32,
}

impl ClientMessage {
    #[must_use]
    pub fn new(
        severity: i32,
        msgnumber: impl Into<MsgNumber>,
        msgstring: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            msgnumber: msgnumber.into(),
            msgstring: msgstring.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_os_error(mut self, osnumber: i32, osstring: impl Into<String>) -> Self {
        self.osnumber = osnumber;
        self.osstring = osstring.into();
        self.osstringlen = i32::try_from(self.osstring.len()).unwrap_or(i32::MAX);
        self
    }

    /// OS error number and text, when the library attached any.
    #[must_use]
    pub fn os_error(&self) -> Option<(i32, &str)> {
        guarded(&self.osstring, self.osstringlen).map(|text| (self.osnumber, text))
    }
}

/// A message returned by the remote server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerMessage {
    pub msgnumber: i32,
    pub severity: i32,
    pub state: i32,
    pub line: i32,
    pub svrname: String,
    pub svrnlen: i32,
    pub proc_name: String,
    pub proclen: i32,
    pub text: String,
}

impl ServerMessage {
    #[must_use]
    pub fn new(msgnumber: i32, severity: i32, state: i32, line: i32, text: impl Into<String>) -> Self {
        Self {
            msgnumber,
            severity,
            state,
            line,
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.svrname = name.into();
        self.svrnlen = i32::try_from(self.svrname.len()).unwrap_or(i32::MAX);
        self
    }

    #[must_use]
    pub fn with_procedure(mut self, name: impl Into<String>) -> Self {
        self.proc_name = name.into();
        self.proclen = i32::try_from(self.proc_name.len()).unwrap_or(i32::MAX);
        self
    }

    #[must_use]
    pub fn server_name(&self) -> Option<&str> {
        guarded(&self.svrname, self.svrnlen)
    }

    #[must_use]
    pub fn procedure(&self) -> Option<&str> {
        guarded(&self.proc_name, self.proclen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_fields_decode() {
        let n = MsgNumber::pack(1, 2, 5, 123);
        assert_eq!(n.layer(), 1);
        assert_eq!(n.origin(), 2);
        assert_eq!(n.severity(), 5);
        assert_eq!(n.number(), 123);
    }

    #[test]
    fn high_layer_survives_sign_bit() {
        let n = MsgNumber::pack(0xff, 0, 0, 1);
        assert!(n.0 < 0);
        assert_eq!(n.layer(), 0xff);
        assert_eq!(n.number(), 1);
    }

    #[test]
    fn optional_fields_follow_length() {
        let mut msg = ClientMessage::new(1, MsgNumber(0), "x").with_os_error(110, "Connection timed out");
        assert_eq!(msg.os_error(), Some((110, "Connection timed out")));

        msg.osstringlen = 0;
        assert_eq!(msg.os_error(), None);

        msg.osstringlen = -3;
        assert_eq!(msg.os_error(), None);

        msg.osstringlen = 10;
        assert_eq!(msg.os_error(), Some((110, "Connection")));
    }

    #[test]
    fn length_past_text_is_clamped() {
        let mut msg = ServerMessage::new(1, 1, 1, 1, "t");
        msg.proc_name = "sp_foo".into();
        msg.proclen = 255;
        assert_eq!(msg.procedure(), Some("sp_foo"));
        assert_eq!(msg.server_name(), None);
    }

    #[test]
    fn length_inside_multibyte_char_stops_before_it() {
        let mut msg = ServerMessage::new(1, 1, 1, 1, "t").with_procedure("é_proc");
        let mut owned = Vec::new();
        for len in 1..=3 {
            msg.proclen = len;
            owned.push(msg.procedure().map(str::to_owned));
        }
        let seen: Vec<Option<&str>> = owned.iter().map(|s| s.as_deref()).collect();
        assert_eq!(seen, vec![Some(""), Some("é"), Some("é_")]);

        let msg = ClientMessage {
            osstring: "Ошибка".into(),
            osstringlen: 3,
            ..ClientMessage::default()
        };
        assert_eq!(msg.os_error(), Some((0, "О")));
    }
}
