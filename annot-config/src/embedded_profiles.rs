use std::collections::HashMap;

/// Embedded tool profile files
fn get_embedded_profiles() -> HashMap<&'static str, &'static str> {
    let mut profiles = HashMap::new();

    profiles.insert("default", include_str!("../profiles/default.yaml"));
    profiles.insert(
        "haplotype-caller",
        include_str!("../profiles/haplotype-caller.yaml"),
    );
    profiles.insert(
        "genotype-gvcfs",
        include_str!("../profiles/genotype-gvcfs.yaml"),
    );
    profiles.insert("minimal", include_str!("../profiles/minimal.yaml"));
    profiles.insert("none", include_str!("../profiles/none.yaml"));

    profiles
}

/// Get list of available profile names, sorted
pub fn get_profile_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = get_embedded_profiles().keys().copied().collect();
    names.sort_unstable();
    names
}

/// Get profile content by name
pub fn get_profile_content(name: &str) -> Option<&'static str> {
    get_embedded_profiles().get(name).copied()
}
