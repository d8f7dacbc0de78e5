pub struct CatalogMessages {
    pub plugins_header: &'static str,
    pub plugin_entry: &'static str,
    pub plugin_groups: &'static str,
    pub argument_entry: &'static str,
    pub groups_header: &'static str,
    pub group_entry: &'static str,
    pub profiles_header: &'static str,
    pub profile_entry: &'static str,
}

pub const CATALOG_MESSAGES: CatalogMessages = CatalogMessages {
    plugins_header: "📦 Available annotations:",
    plugin_entry: "\n  {name} [{capability}]",
    plugin_groups: "    groups: {groups}",
    argument_entry: "    --{argument} <{kind}>{required} {description}",
    groups_header: "\n🏷️  Annotation groups:",
    group_entry: "  {group}: {members}",
    profiles_header: "🧰 Tool profiles:",
    profile_entry: "  {name} - {description}",
};
