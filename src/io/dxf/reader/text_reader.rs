//! DXF ASCII text reader

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationType};

/// Line cursor over an ASCII DXF document
pub struct DxfTextReader<'a> {
    lines: Vec<&'a str>,
    position: usize,
    peeked_pair: Option<DxfCodePair<'a>>,
    strict_group_codes: bool,
    notifications: NotificationCollection,
}

impl<'a> DxfTextReader<'a> {
    /// Create a reader over `text`; `\r\n` and `\n` both end a line
    pub fn new(text: &'a str, strict_group_codes: bool) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self {
            lines: text.lines().collect(),
            position: 0,
            peeked_pair: None,
            strict_group_codes,
            notifications: NotificationCollection::new(),
        }
    }

    /// Number of lines consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    fn read_line(&mut self) -> Result<&'a str> {
        let line = self
            .lines
            .get(self.position)
            .copied()
            .ok_or(DxfError::UnexpectedEndOfInput { line: self.position + 1 })?;
        self.position += 1;
        Ok(line)
    }
}

impl<'a> DxfStreamReader<'a> for DxfTextReader<'a> {
    fn read_pair(&mut self) -> Result<DxfCodePair<'a>> {
        if let Some(pair) = self.peeked_pair.take() {
            return Ok(pair);
        }

        loop {
            let line = self.position + 1;
            let code_line = self.read_line()?;
            let value = self.read_line()?;

            match code_line.trim().parse::<i32>() {
                Ok(code) => return Ok(DxfCodePair::new(code, value, line)),
                Err(_) if self.strict_group_codes => {
                    return Err(DxfError::InvalidGroupCode {
                        line,
                        value: code_line.to_string(),
                    })
                }
                Err(_) => self.notifications.notify(
                    NotificationType::Warning,
                    format!("invalid group code {:?} at line {} skipped", code_line.trim(), line),
                ),
            }
        }
    }

    fn push_back(&mut self, pair: DxfCodePair<'a>) {
        self.peeked_pair = Some(pair);
    }

    fn notifications_mut(&mut self) -> &mut NotificationCollection {
        &mut self.notifications
    }
}
