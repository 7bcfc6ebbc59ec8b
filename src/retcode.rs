use std::fmt;

/// Status codes exchanged with the client library.
///
/// Callbacks return one of these to the library, and every library call
/// used during registration reports one back. Values the crate does not
/// know about are kept as [`RetCode::Other`] so they can still be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetCode {
    Succeed,
    Fail,
    MemError,
    Pending,
    Quiet,
    Busy,
    Interrupt,
    BlkHasText,
    Continue,
    Fatal,
    RetHaFailover,
    Unsupported,
    Canceled,
    RowFail,
    EndData,
    EndResults,
    EndItem,
    NoMsg,
    TimedOut,
    Other(i32),
}

const KNOWN: &[(RetCode, i32, &str)] = &[
    (RetCode::Succeed, 1, "CS_SUCCEED"),
    (RetCode::Fail, 0, "CS_FAIL"),
    (RetCode::MemError, -1, "CS_MEM_ERROR"),
    (RetCode::Pending, -2, "CS_PENDING"),
    (RetCode::Quiet, -3, "CS_QUIET"),
    (RetCode::Busy, -4, "CS_BUSY"),
    (RetCode::Interrupt, -5, "CS_INTERRUPT"),
    (RetCode::BlkHasText, -6, "CS_BLK_HAS_TEXT"),
    (RetCode::Continue, -7, "CS_CONTINUE"),
    (RetCode::Fatal, -8, "CS_FATAL"),
    (RetCode::RetHaFailover, -9, "CS_RET_HAFAILOVER"),
    (RetCode::Unsupported, -10, "CS_UNSUPPORTED"),
    (RetCode::Canceled, -202, "CS_CANCELED"),
    (RetCode::RowFail, -203, "CS_ROW_FAIL"),
    (RetCode::EndData, -204, "CS_END_DATA"),
    (RetCode::EndResults, -205, "CS_END_RESULTS"),
    (RetCode::EndItem, -206, "CS_END_ITEM"),
    (RetCode::NoMsg, -207, "CS_NOMSG"),
    (RetCode::TimedOut, -208, "CS_TIMED_OUT"),
];

impl RetCode {
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        KNOWN
            .iter()
            .find(|(_, value, _)| *value == raw)
            .map_or(RetCode::Other(raw), |(code, _, _)| *code)
    }

    #[must_use]
    pub fn as_raw(self) -> i32 {
        match self {
            RetCode::Other(raw) => raw,
            known => KNOWN
                .iter()
                .find(|(code, _, _)| *code == known)
                .map_or(0, |(_, value, _)| *value),
        }
    }

    /// Symbolic name, `None` for codes outside the known set.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        KNOWN
            .iter()
            .find(|(code, _, _)| *code == self)
            .map(|(_, _, name)| *name)
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        self == RetCode::Succeed
    }
}

impl From<i32> for RetCode {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for RetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.as_raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_both_ways() {
        for (code, raw, name) in KNOWN {
            assert_eq!(RetCode::from_raw(*raw), *code);
            assert_eq!(code.as_raw(), *raw);
            assert_eq!(code.name(), Some(*name));
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        let code = RetCode::from_raw(4242);
        assert_eq!(code, RetCode::Other(4242));
        assert_eq!(code.name(), None);
        assert_eq!(code.to_string(), "4242");
    }

    #[test]
    fn display_uses_symbolic_name() {
        assert_eq!(RetCode::Fail.to_string(), "CS_FAIL");
        assert!(RetCode::Succeed.is_success());
        assert!(!RetCode::NoMsg.is_success());
    }
}
