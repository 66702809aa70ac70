use crate::models::UserContext;

pub const SEARCH_SYSTEM: &str = include_str!("../data/prompts/search_system.txt");
pub const SUGGESTIONS_SYSTEM: &str = include_str!("../data/prompts/suggestions_system.txt");
pub const SUGGESTIONS_USER: &str = include_str!("../data/prompts/suggestions_user.txt");

const NONE_LISTED: &str = "(none)";

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// System prompt for a visitor search, grounded in the profile.
pub fn build_search_system_prompt(ctx: &UserContext) -> String {
    render(
        SEARCH_SYSTEM,
        &[
            ("name", &ctx.profile.display_name),
            ("bio", bio(ctx)),
            ("links", &links_block(ctx)),
            ("social", &social_block(ctx)),
        ],
    )
}

/// User prompt asking for starter questions about the profile.
pub fn build_suggestions_user_prompt(ctx: &UserContext) -> String {
    let titles: Vec<&str> = ctx.links.iter().map(|l| l.title.as_str()).collect();
    let links = if titles.is_empty() {
        NONE_LISTED.to_string()
    } else {
        titles.join(", ")
    };

    render(
        SUGGESTIONS_USER,
        &[
            ("name", &ctx.profile.display_name),
            ("bio", bio(ctx)),
            ("links", &links),
        ],
    )
}

fn bio(ctx: &UserContext) -> &str {
    ctx.profile
        .bio
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or(NONE_LISTED)
}

fn links_block(ctx: &UserContext) -> String {
    if ctx.links.is_empty() {
        return NONE_LISTED.to_string();
    }
    ctx.links
        .iter()
        .map(|l| format!("- {}: {}", l.title, l.url))
        .collect::<Vec<_>>()
        .join("\n")
}

fn social_block(ctx: &UserContext) -> String {
    if ctx.social_links.is_empty() {
        return NONE_LISTED.to_string();
    }
    ctx.social_links
        .iter()
        .map(|s| format!("- {}: {}", s.platform, s.url))
        .collect::<Vec<_>>()
        .join("\n")
}
