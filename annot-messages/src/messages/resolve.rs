pub struct ResolveMessages {
    pub summary: &'static str,
    pub empty: &'static str,
    pub info_header: &'static str,
    pub genotype_header: &'static str,
    pub entry: &'static str,
    pub entry_with_arguments: &'static str,
    pub defaults_disabled: &'static str,
}

pub const RESOLVE_MESSAGES: ResolveMessages = ResolveMessages {
    summary: "✅ {count} annotation(s) enabled (profile: {profile})",
    empty: "ℹ️  No annotations enabled (profile: {profile})",
    info_header: "\n📋 Per-record annotations:",
    genotype_header: "\n🧬 Per-genotype annotations:",
    entry: "  • {name}",
    entry_with_arguments: "  • {name} ({arguments})",
    defaults_disabled: "⚠️  Tool default annotations disabled",
};
