//! Command parsing and reply rendering.
//!
//! Matching is exact and case-sensitive. Text that is not a command gets no
//! reply at all; a command that cannot be answered gets an explicit reply.

use heightwatch_state::{ClaimOutcome, ClaimOwner, PoolState};

/// Discord rejects messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 2000;

const FENCE: &str = "```";

const HELP: &str = "Available commands:\n\n\
.help           Display this help message\n\
.heights        Display the heights of all known pools\n\
.height         Display the median height of all pools\n\
.height <pool>  Display the height of <pool>\n\
.claim <pool>   Claim the pool <pool> as your pool";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Heights,
    Height,
    PoolHeight(String),
    Claim(String),
}

impl Command {
    /// Parse a message. Returns `None` for anything that is not a command.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            ".help" => return Some(Self::Help),
            ".heights" => return Some(Self::Heights),
            ".height" => return Some(Self::Height),
            _ => {}
        }

        if let Some(pool) = argument(text, ".height") {
            return Some(Self::PoolHeight(pool));
        }
        if let Some(pool) = argument(text, ".claim") {
            return Some(Self::Claim(pool));
        }
        None
    }
}

/// `"<command> <arg>"` → `arg`, trimmed and non-empty.
fn argument(text: &str, command: &str) -> Option<String> {
    let rest = text.strip_prefix(command)?.strip_prefix(' ')?.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Render the replies for `command`. Always at least one message.
pub async fn respond(command: &Command, state: &PoolState, author: &ClaimOwner) -> Vec<String> {
    match command {
        Command::Help => vec![code_block(HELP)],
        Command::Heights => render_heights(state),
        Command::Height => vec![render_median(state)],
        Command::PoolHeight(pool) => vec![render_pool_height(state, pool).await],
        Command::Claim(pool) => vec![render_claim(state, pool, author).await],
    }
}

fn render_heights(state: &PoolState) -> Vec<String> {
    let report = state.heights();
    if report.heights.is_empty() {
        return vec![code_block("No pool heights known yet.")];
    }

    let lines = report
        .heights
        .iter()
        .map(|(name, height)| format!("{name:<25} {height}"));
    chunk_code_blocks("All known pool heights:\n\n", lines)
}

fn render_median(state: &PoolState) -> String {
    match state.heights().aggregate {
        Some(height) => code_block(&format!("Median pool height:\n\n{height}")),
        None => code_block("No pool heights known yet."),
    }
}

async fn render_pool_height(state: &PoolState, pool: &str) -> String {
    let Some(height) = state.heights().heights.get(pool) else {
        return code_block(&format!("No height known for pool {pool}."));
    };

    let mut text = format!("Height of {pool}:\n\n{height}");
    if let Some(owner) = state.claims().owner_of(pool).await {
        text.push_str(&format!("\n\nClaimed by {}", owner.display_name));
    }
    code_block(&text)
}

async fn render_claim(state: &PoolState, pool: &str, author: &ClaimOwner) -> String {
    if !state.registry().contains(pool) {
        return code_block(&format!("Pool {pool} not found."));
    }

    let text = match state.claims().claim(pool, author.clone()).await {
        ClaimOutcome::Claimed => format!("{pool} is now claimed by {}.", author.display_name),
        ClaimOutcome::AlreadyYours => format!("You have already claimed {pool}."),
        ClaimOutcome::TakenBy(owner) => {
            format!("{pool} has already been claimed by {}.", owner.display_name)
        }
    };
    code_block(&text)
}

fn code_block(text: &str) -> String {
    format!("{FENCE}\n{text}{FENCE}")
}

/// Pack `header` and `lines` into as few code blocks as fit the message limit.
///
/// A line too long to share a message with the header is truncated, so the
/// header never goes out alone.
fn chunk_code_blocks(header: &str, lines: impl Iterator<Item = String>) -> Vec<String> {
    let budget = MESSAGE_LIMIT - code_block("").chars().count();
    let max_line = budget.saturating_sub(header.chars().count() + 1);
    let mut messages = Vec::new();
    let mut current = header.to_string();

    for line in lines {
        let line: String = line.chars().take(max_line).collect();
        if current.chars().count() + line.chars().count() + 1 > budget {
            messages.push(code_block(&current));
            current.clear();
        }
        current.push_str(&line);
        current.push('\n');
    }

    if !current.is_empty() {
        messages.push(code_block(&current));
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use heightwatch_core::{EndpointDescriptor, HeightReport, HeightSnapshot};

    fn author() -> ClaimOwner {
        ClaimOwner::new(42, "alice")
    }

    fn state_with(pools: &[(&str, Option<u64>)]) -> PoolState {
        let state = PoolState::new();
        state.publish_registry(
            pools
                .iter()
                .map(|(name, _)| EndpointDescriptor::new(*name, format!("http://{name}/")))
                .collect(),
        );
        let heights: HeightSnapshot = pools
            .iter()
            .filter_map(|(name, h)| h.map(|h| (name.to_string(), h)))
            .collect();
        state.publish_heights(HeightReport::from_heights(heights, 1));
        state
    }

    #[test]
    fn parse_exact_commands() {
        assert_eq!(Command::parse(".help"), Some(Command::Help));
        assert_eq!(Command::parse(".heights"), Some(Command::Heights));
        assert_eq!(Command::parse(".height"), Some(Command::Height));
    }

    #[test]
    fn parse_commands_with_pool() {
        assert_eq!(
            Command::parse(".height PoolA"),
            Some(Command::PoolHeight("PoolA".to_string()))
        );
        assert_eq!(
            Command::parse(".claim  Pool A "),
            Some(Command::Claim("Pool A".to_string()))
        );
    }

    #[test]
    fn parse_rejects_everything_else() {
        assert_eq!(Command::parse(".HELP"), None);
        assert_eq!(Command::parse(" .help"), None);
        assert_eq!(Command::parse(".help me"), None);
        assert_eq!(Command::parse(".height "), None);
        assert_eq!(Command::parse(".heightPoolA"), None);
        assert_eq!(Command::parse(".claim"), None);
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[tokio::test]
    async fn help_lists_every_command() {
        let replies = respond(&Command::Help, &PoolState::new(), &author()).await;
        assert_eq!(replies.len(), 1);
        for cmd in [".help", ".heights", ".height <pool>", ".claim <pool>"] {
            assert!(replies[0].contains(cmd), "help is missing {cmd}");
        }
    }

    #[tokio::test]
    async fn heights_lists_only_polled_pools() {
        let state = state_with(&[("PoolB", Some(200)), ("PoolA", Some(100)), ("Down", None)]);
        let replies = respond(&Command::Heights, &state, &author()).await;

        assert_eq!(replies.len(), 1);
        let text = &replies[0];
        assert!(text.starts_with("```\nAll known pool heights:"));
        assert!(text.contains(&format!("{:<25} {}", "PoolA", 100)));
        assert!(text.contains(&format!("{:<25} {}", "PoolB", 200)));
        assert!(!text.contains("Down"));
        assert!(text.find("PoolA").unwrap() < text.find("PoolB").unwrap());
    }

    #[tokio::test]
    async fn heights_follow_the_latest_report() {
        let state = state_with(&[("PoolA", Some(100)), ("PoolB", Some(200))]);

        let heights: HeightSnapshot = [("PoolA".to_string(), 101)].into_iter().collect();
        state.publish_heights(HeightReport::from_heights(heights, 2));

        let text = respond(&Command::Heights, &state, &author()).await.join("");
        assert!(text.contains("101"));
        assert!(!text.contains("PoolB"));
    }

    #[tokio::test]
    async fn heights_split_across_messages() {
        let pools: Vec<(String, Option<u64>)> = (0..200)
            .map(|i| (format!("pool-{i:03}"), Some(1_000_000 + i)))
            .collect();
        let borrowed: Vec<(&str, Option<u64>)> =
            pools.iter().map(|(n, h)| (n.as_str(), *h)).collect();
        let state = state_with(&borrowed);

        let replies = respond(&Command::Heights, &state, &author()).await;

        assert!(replies.len() > 1);
        for reply in &replies {
            assert!(reply.chars().count() <= MESSAGE_LIMIT);
            assert!(reply.starts_with("```\n") && reply.ends_with("```"));
        }
        let joined = replies.join("");
        assert!(joined.contains("pool-000"));
        assert!(joined.contains("pool-199"));
    }

    #[tokio::test]
    async fn heights_when_nothing_polled() {
        let replies = respond(&Command::Heights, &PoolState::new(), &author()).await;
        assert_eq!(replies, vec!["```\nNo pool heights known yet.```".to_string()]);
    }

    #[tokio::test]
    async fn median_height() {
        let state = state_with(&[("a", Some(1)), ("b", Some(2)), ("c", Some(3)), ("d", Some(4))]);
        let replies = respond(&Command::Height, &state, &author()).await;
        assert_eq!(replies, vec!["```\nMedian pool height:\n\n2```".to_string()]);
    }

    #[tokio::test]
    async fn median_without_data() {
        let replies = respond(&Command::Height, &PoolState::new(), &author()).await;
        assert!(replies[0].contains("No pool heights known yet."));
    }

    #[tokio::test]
    async fn pool_height_lookup() {
        let state = state_with(&[("PoolA", Some(12345)), ("Down", None)]);

        let found = respond(&Command::PoolHeight("PoolA".into()), &state, &author()).await;
        assert!(found[0].contains("12345"));

        let down = respond(&Command::PoolHeight("Down".into()), &state, &author()).await;
        assert!(down[0].contains("No height known for pool Down."));

        let unknown = respond(&Command::PoolHeight("Nope".into()), &state, &author()).await;
        assert!(unknown[0].contains("No height known for pool Nope."));
    }

    #[tokio::test]
    async fn claim_flow() {
        let state = state_with(&[("PoolA", Some(1))]);
        let bob = ClaimOwner::new(7, "bob");

        let first = respond(&Command::Claim("PoolA".into()), &state, &author()).await;
        assert!(first[0].contains("PoolA is now claimed by alice."));

        let again = respond(&Command::Claim("PoolA".into()), &state, &author()).await;
        assert!(again[0].contains("You have already claimed PoolA."));

        let other = respond(&Command::Claim("PoolA".into()), &state, &bob).await;
        assert!(other[0].contains("PoolA has already been claimed by alice."));

        let shown = respond(&Command::PoolHeight("PoolA".into()), &state, &bob).await;
        assert!(shown[0].contains("Claimed by alice"));
    }

    #[tokio::test]
    async fn claim_unknown_pool() {
        let state = state_with(&[("PoolA", Some(1))]);
        let replies = respond(&Command::Claim("Ghost".into()), &state, &author()).await;
        assert!(replies[0].contains("Pool Ghost not found."));
        assert!(state.claims().is_empty().await);
    }

    #[test]
    fn oversized_line_is_truncated() {
        let huge = "x".repeat(MESSAGE_LIMIT * 2);
        let messages = chunk_code_blocks("", std::iter::once(huge));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].chars().count() <= MESSAGE_LIMIT);
    }

    #[test]
    fn header_stays_with_an_oversized_first_line() {
        let header = "All known pool heights:\n\n";
        let lines = ["x".repeat(MESSAGE_LIMIT), "short 1".to_string()];
        let messages = chunk_code_blocks(header, lines.into_iter());

        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with(&format!("```\n{header}xxx")));
        assert!(messages[0].chars().count() <= MESSAGE_LIMIT);
        assert_eq!(messages[1], "```\nshort 1\n```");
    }
}
