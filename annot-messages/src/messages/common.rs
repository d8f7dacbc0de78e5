pub struct CommonMessages {
    pub error_generic: &'static str,
    pub none: &'static str,
}

pub const COMMON_MESSAGES: CommonMessages = CommonMessages {
    error_generic: "❌ {error}",
    none: "(none)",
};
