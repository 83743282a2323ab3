//! Canonical schema constants for structured logging
//!
//! Every log line emitted through the logging macros carries these keys so
//! that batch runs can be followed across the engine, store and HTTP layers.

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Domain identifiers
pub const FIELD_STACK_A: &str = "stack_a";
pub const FIELD_STACK_B: &str = "stack_b";
pub const FIELD_FILE: &str = "file";
pub const FIELD_DIFF_ID: &str = "diff_id";

// Diff result sizes
pub const FIELD_LEFT_NOT_RIGHT_LEN: &str = "left_not_right_len";
pub const FIELD_RIGHT_NOT_LEFT_LEN: &str = "right_not_left_len";
pub const FIELD_SAME_VALUE_LEN: &str = "same_key_same_value_len";
pub const FIELD_DIFF_VALUE_LEN: &str = "same_key_diff_value_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
