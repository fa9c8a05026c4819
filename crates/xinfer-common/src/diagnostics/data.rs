use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const CANNOT_INFER_TYPE_FROM_RECURSIVE_USAGE: u32 = 4001;
    pub const CANNOT_INFER_TYPE: u32 = 4002;
    pub const CANNOT_INFER_TYPE_OF_MEMBER_RESOLVED_ELSEWHERE: u32 = 4003;
    pub const CANNOT_INFER_TYPE_OUTSIDE_OF_ROOT: u32 = 4004;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::CANNOT_INFER_TYPE_FROM_RECURSIVE_USAGE,
        category: DiagnosticCategory::Warning,
        message: "Cannot infer type of '{0}' from recursive usage. Type '{1}' is used.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::CANNOT_INFER_TYPE,
        category: DiagnosticCategory::Error,
        message: "Cannot infer type of '{0}'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::CANNOT_INFER_TYPE_OF_MEMBER_RESOLVED_ELSEWHERE,
        category: DiagnosticCategory::Warning,
        message: "Cannot infer type of '{0}' while its root '{1}' is still being resolved. Type '{2}' is used.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::CANNOT_INFER_TYPE_OUTSIDE_OF_ROOT,
        category: DiagnosticCategory::Warning,
        message: "Cannot infer type of '{0}' outside of its root '{1}'. Type '{2}' is used.",
    },
];
