// Visual symbols used in CLI output
// Using generic names that represent meaning rather than the specific emoji

/// Status and feedback symbols
pub const SYMBOL_INDICATOR_SUCCESS: &str = "✅";
pub const SYMBOL_INDICATOR_ERROR: &str = "❌";
pub const SYMBOL_INDICATOR_WARNING: &str = "⚠️";
pub const SYMBOL_INDICATOR_INFO: &str = "📋";

/// Content and structure symbols
pub const SYMBOL_CONTENT_ARROW_RIGHT: &str = "→";
pub const SYMBOL_CONTENT_PACKAGE: &str = "📦";
pub const SYMBOL_CONTENT_CLASS: &str = "🏷️";

/// Tool and documentation symbols
pub const SYMBOL_TOOL_CONFIG: &str = "🔧";
pub const SYMBOL_TOOL_LINK: &str = "🔗";
pub const SYMBOL_DOC_NOTE: &str = "📝";
pub const SYMBOL_DOC_BOOK: &str = "📖";
pub const SYMBOL_ACTION_LAUNCH: &str = "🚀";
pub const SYMBOL_SCOPE_GLOBAL: &str = "🌐";
