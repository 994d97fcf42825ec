//! Outbound command construction
//!
//! Controller → Panel payloads are a command name followed by positional
//! fields, all joined with [`SEPARATOR`]:
//!
//! ```text
//! pageType~cardEntities
//! timeout~20
//! dimmode~10~100~6371
//! entityUpdateDetail~uuid.ab12~~64909~1~50~disable~enable~...
//! ```

use alloc::string::String;
use core::fmt::{Display, Write};

/// Field separator used by the panel firmware
pub const SEPARATOR: char = '~';

/// Appends a command into a caller owned buffer
///
/// The writer does not flush anything: it only shapes the text. Callers
/// hand it the scheduler's staging buffer once that buffer is free.
pub struct CommandWriter<'a> {
    buf: &'a mut String,
}

impl<'a> CommandWriter<'a> {
    /// Start a command, replacing whatever `buf` held
    pub fn new(buf: &'a mut String, name: &str) -> Self {
        buf.clear();
        buf.push_str(name);
        Self { buf }
    }

    /// Continue an already started command
    pub fn append(buf: &'a mut String) -> Self {
        Self { buf }
    }

    /// Append a separator and a formatted field
    pub fn field(&mut self, value: impl Display) -> &mut Self {
        self.buf.push(SEPARATOR);
        // Writing into a String cannot fail
        let _ = write!(self.buf, "{}", value);
        self
    }

    /// Append an empty positional field
    pub fn empty(&mut self) -> &mut Self {
        self.buf.push(SEPARATOR);
        self
    }

    /// Append text verbatim without a separator
    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    /// Text written so far
    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    /// `pageType~<type>`
    pub fn page_type(buf: &'a mut String, page_type: &str) -> Self {
        let mut writer = Self::new(buf, "pageType");
        writer.field(page_type);
        writer
    }

    /// `timeout~<seconds>`
    pub fn timeout(buf: &'a mut String, seconds: u16) -> Self {
        let mut writer = Self::new(buf, "timeout");
        writer.field(seconds);
        writer
    }

    /// `dimmode~<inactive>~<active>~<background>`
    pub fn dim_mode(buf: &'a mut String, inactive: u8, active: u8, background: u16) -> Self {
        let mut writer = Self::new(buf, "dimmode");
        writer.field(inactive).field(active).field(background);
        writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_separated() {
        let mut buf = String::new();
        CommandWriter::new(&mut buf, "entityUpd")
            .field("uuid.a")
            .empty()
            .field(17299);
        assert_eq!(buf, "entityUpd~uuid.a~~17299");
    }

    #[test]
    fn test_new_replaces_previous_text() {
        let mut buf = String::from("stale");
        CommandWriter::new(&mut buf, "timeout").field(10);
        assert_eq!(buf, "timeout~10");
    }

    #[test]
    fn test_append_continues() {
        let mut buf = String::new();
        CommandWriter::new(&mut buf, "entityUpd").field("Kitchen");
        CommandWriter::append(&mut buf).field("x").raw("y");
        assert_eq!(buf, "entityUpd~Kitchen~xy");
    }

    #[test]
    fn test_helpers() {
        let mut buf = String::new();
        CommandWriter::page_type(&mut buf, "cardGrid");
        assert_eq!(buf, "pageType~cardGrid");

        CommandWriter::timeout(&mut buf, 30);
        assert_eq!(buf, "timeout~30");

        CommandWriter::dim_mode(&mut buf, 10, 100, 6371);
        assert_eq!(buf, "dimmode~10~100~6371");
    }
}
