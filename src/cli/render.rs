//! Text rendering for the terminal frontend
//!
//! Every function here is pure: it turns game data into the text block the
//! terminal presenter prints.

use crate::domain::{
    CertificationConfig, DomainInfo, Player, ThemeDefinition, Voice,
};
use crate::game::{EndingBand, Readiness, SessionSummary};

const HP_SEGMENTS: usize = 10;
const XP_SEGMENTS: usize = 20;
const DOMAIN_NAME_COLUMN: usize = 22;

/// Word-wrap `text` to `width` columns, keeping blank-line paragraph
/// breaks. Continuation lines are indented by two spaces.
pub fn wrap_text(text: &str, width: usize) -> String {
    let paragraphs: Vec<String> = text
        .trim()
        .split("\n\n")
        .map(|paragraph| {
            let mut lines: Vec<String> = Vec::new();
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                if !current.is_empty() && current.len() + word.len() + 1 > width {
                    lines.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
            if !current.is_empty() {
                lines.push(current);
            }
            lines.join("\n  ")
        })
        .collect();
    paragraphs.join("\n\n  ")
}

fn rule(ch: char, len: usize) -> String {
    std::iter::repeat_n(ch, len).collect()
}

fn bar(filled: usize, segments: usize, fill: char) -> String {
    let filled = filled.min(segments);
    format!("{}{}", rule(fill, filled), rule('-', segments - filled))
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Narrative panel headed by the narrator label
pub fn render_narrative(text: &str, narrator: &str, width: usize) -> String {
    let inner = width.saturating_sub(4);
    let wrapped = wrap_text(text, width.saturating_sub(6));
    format!(
        "\n  [{}]\n  {}\n  {}\n  {}\n",
        narrator,
        rule('-', inner),
        wrapped,
        rule('-', inner)
    )
}

pub fn render_title_screen(config: &CertificationConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n  {}\n", rule('=', 60)));
    out.push_str(&format!("  {:^60}\n", "C E R T Q U E S T"));
    out.push_str(&format!("  {:^60}\n", config.name));
    if !config.full_name.is_empty() && config.full_name != config.name {
        out.push_str(&format!("  {:^60}\n", config.full_name));
    }
    out.push_str(&format!("  {}\n", rule('=', 60)));
    if !config.organization.is_empty() {
        out.push_str(&format!("    By {}\n", config.organization));
    }
    out
}

pub fn render_theme_menu(themes: &[ThemeDefinition]) -> String {
    let mut out = String::from("\n  Choose your story style:\n\n");
    for (number, theme) in themes.iter().enumerate().map(|(i, t)| (i + 1, t)) {
        if theme.game_title.is_empty() {
            out.push_str(&format!("    [{}] {}\n", number, theme.display_name));
        } else {
            out.push_str(&format!(
                "    [{}] {} - {}\n",
                number, theme.display_name, theme.game_title
            ));
        }
        if !theme.description.is_empty() {
            out.push_str(&format!("        {}\n", theme.description));
        }
        out.push('\n');
    }
    out.push_str("    (You can switch themes anytime during scenarios by pressing 0)\n");
    out
}

pub fn render_invalid_theme_choice(theme_count: usize) -> String {
    format!("  Please enter a number from 1 to {}.", theme_count)
}

/// Banner shown once the theme is settled
pub fn render_theme_title(config: &CertificationConfig, theme: &ThemeDefinition) -> String {
    let game_title = if theme.game_title.is_empty() {
        config.name.as_str()
    } else {
        theme.game_title.as_str()
    };
    let subtitle = format!("A {} Training Experience", config.name);
    format!(
        "\n    +{border}+\n    |{blank}|\n    |{title:^75}|\n    |{blank}|\n    |{subtitle:^75}|\n    |{blank}|\n    +{border}+\n",
        border = rule('=', 75),
        blank = " ".repeat(75),
        title = game_title,
        subtitle = subtitle,
    )
}

pub fn render_introduction(
    config: &CertificationConfig,
    theme: &ThemeDefinition,
    width: usize,
) -> String {
    let text = match theme.voice {
        Voice::Corporate => format!(
            "Welcome to the {name} Training Program!\n\n\
             You've been selected for this comprehensive training experience. \
             {count} modules await your completion.\n\n\
             Complete your training with flying colors, and you'll earn recognition \
             as a certified professional.\n\n\
             Good luck, and remember: the coffee in the break room is free.",
            name = config.name,
            count = config.domain_count
        ),
        Voice::Fantasy => format!(
            "The time has come to prove your worth.\n\n\
             Within these ancient halls, knowledge is power, and mastery is earned. \
             You have been summoned to face {count} domains of trials.\n\n\
             Make wise choices, and you shall ascend to recognition \
             as a certified professional.\n\n\
             Let your journey begin.",
            count = config.domain_count
        ),
    };
    render_narrative(&text, &theme.narrator, width)
}

pub fn render_name_prompt(theme: &ThemeDefinition) -> String {
    match theme.voice {
        Voice::Corporate => "\n  What name should we put on your desk nameplate?".to_string(),
        Voice::Fantasy => format!(
            "\n  What name shall the Chronicles record for you, {}?",
            theme.player_term
        ),
    }
}

pub fn render_welcome(name: &str, theme: &ThemeDefinition) -> String {
    match theme.voice {
        Voice::Corporate => format!("\n  Welcome aboard, {}. Let's get started.\n", name),
        Voice::Fantasy => format!("\n  Welcome, {}. May your judgment be sound.\n", name),
    }
}

pub fn render_domain_menu(config: &CertificationConfig, theme: &ThemeDefinition) -> String {
    let (heading, question) = match theme.voice {
        Voice::Corporate => (
            "TRAINING MODULE SELECTION",
            "Which department would you like to start your training in?",
        ),
        Voice::Fantasy => (
            "DOMAIN SELECTION",
            "Which domain would you like to begin your trials?",
        ),
    };

    let mut out = format!(
        "\n  {rule}\n  {heading}\n  {rule}\n\n  {question}\n\n",
        rule = rule('=', 60),
    );
    for domain in 1..=config.domain_count {
        out.push_str(&format!(
            "    [{}] Domain {}: {}\n",
            domain,
            domain,
            config.domain_name(domain)
        ));
    }
    out.push_str("\n    [ENTER] Start from the beginning (Domain 1)\n");
    out
}

pub fn render_invalid_domain_choice(domain_count: u32) -> String {
    format!(
        "  Please enter a number 1-{}, or press ENTER for Domain 1.",
        domain_count
    )
}

pub fn render_domain_jump(
    domain: u32,
    domain_name: &str,
    skipped_domains: u32,
    skipped_xp: u32,
    voice: Voice,
) -> String {
    match voice {
        Voice::Corporate => format!(
            "\n  Starting at Level {}: {}\n  (Previous {} module(s) marked as reviewed: +{} XP)",
            domain, domain_name, skipped_domains, skipped_xp
        ),
        Voice::Fantasy => format!(
            "\n  Beginning at Domain {}: {}\n  (Earlier {} domain(s) acknowledged as mastered: +{} XP)",
            domain, domain_name, skipped_domains, skipped_xp
        ),
    }
}

pub fn render_domain_banner(domain: u32, info: &DomainInfo, theme_key: &str) -> String {
    let title = truncate(info.themed_title(theme_key), 50);
    format!(
        "\n    +{border}+\n    |  [DOMAIN {domain}] {title:<50} |\n    +{border}+\n",
        border = rule('=', 67),
    )
}

pub fn render_domain_advanced(domain: u32, domain_name: &str, voice: Voice, width: usize) -> String {
    let (text, narrator) = match voice {
        Voice::Corporate => (
            format!(
                "Congratulations! You've completed that module. \
                 Time to move on to Level {}: {}.",
                domain, domain_name
            ),
            "HR NOTIFICATION",
        ),
        Voice::Fantasy => (
            format!(
                "You have proven yourself in this domain. \
                 The path to Domain {}: {} opens before you...",
                domain, domain_name
            ),
            "THE CITADEL",
        ),
    };
    render_narrative(&text, narrator, width)
}

/// Heads-up display: hp bar of 10 segments, xp bar of 20 against max xp
pub fn render_hud(player: &Player, config: &CertificationConfig, theme: &ThemeDefinition) -> String {
    let hp_ratio = if player.max_hp() > 0 {
        (f64::from(player.hp()) / f64::from(player.max_hp())).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let hp_bar = bar((hp_ratio * HP_SEGMENTS as f64) as usize, HP_SEGMENTS, '#');

    let xp_ratio = if player.max_xp() > 0 {
        (f64::from(player.xp()) / f64::from(player.max_xp())).min(1.0)
    } else {
        0.0
    };
    let xp_bar = bar((xp_ratio * XP_SEGMENTS as f64) as usize, XP_SEGMENTS, '=');

    let domain = player.current_domain();
    let domain_name = truncate(&config.domain_short_name(domain), 25);

    format!(
        "\n+{border}+\n\
         | {term}: {name:<14} | HP: [{hp_bar}] {hp:>3}/{max_hp:<3} | XP: {xp:>4}/{max_xp}\n\
         | TITLE: {title:<15} | DOMAIN {domain}: {domain_name:<25}\n\
         +{thin}+\n\
         | XP: [{xp_bar}] {pct:>3}%\n\
         +{border}+\n",
        border = rule('=', 78),
        thin = rule('-', 78),
        term = theme.player_term.to_uppercase(),
        name = player.name,
        hp = player.hp(),
        max_hp = player.max_hp(),
        xp = player.xp(),
        max_xp = player.max_xp(),
        title = player.title(&theme.key),
        pct = (xp_ratio * 100.0) as u32,
    )
}

/// Numbered choices followed by the theme-switch hint and the input cursor
pub fn render_choices(choices: &[&str], show_theme_hint: bool) -> String {
    let mut out = String::from("\n  What action do you take?\n\n");
    for (i, choice) in choices.iter().enumerate() {
        out.push_str(&format!("    [{}] {}\n", i + 1, choice));
    }
    if show_theme_hint {
        out.push_str("\n    [0] Switch story theme\n");
    }
    out
}

pub fn render_invalid_choice(num_choices: usize) -> String {
    format!(
        "  Invalid choice. Enter 1-{}, 0 to switch theme, or 'help'.",
        num_choices
    )
}

pub fn render_theme_switched(theme: &ThemeDefinition) -> String {
    format!("\n  [Theme switched to: {}]\n", theme.display_name)
}

pub fn render_success(text: &str, xp_gained: u32, hp_healed: u32, width: usize) -> String {
    let header = rule('=', 60);
    let healed = if hp_healed > 0 {
        format!("  +{} HP restored", hp_healed)
    } else {
        String::new()
    };
    format!(
        "\n  {header}\n  [SUCCESS] - +{xp_gained} XP{healed}\n  {header}\n\n  {}\n\n  {header}\n",
        wrap_text(text, width.saturating_sub(6)),
    )
}

pub fn render_failure(
    text: &str,
    hp_lost: u32,
    reference: &str,
    correct_number: usize,
    correct_text: Option<&str>,
    width: usize,
) -> String {
    let header = rule('=', 60);
    let mut out = format!(
        "\n  {header}\n  [CONSEQUENCE] - -{hp_lost} HP\n  {header}\n\n  [POST-MORTEM ANALYSIS]\n  {}\n",
        wrap_text(text, width.saturating_sub(6)),
    );
    if let Some(correct) = correct_text.filter(|t| !t.is_empty()) {
        out.push_str(&format!(
            "\n  [CORRECT ANSWER]\n  [{}] {}\n",
            correct_number, correct
        ));
    }
    if !reference.is_empty() {
        out.push_str(&format!("\n  [REFERENCE: {}]\n", reference));
    }
    out.push_str(&format!("\n  {header}\n"));
    out
}

pub fn render_promotion(title: &str, voice: Voice) -> String {
    match voice {
        Voice::Corporate => format!("\n  *** PROMOTION! New title: {} ***\n", title),
        Voice::Fantasy => format!("\n  *** A new title is bestowed upon you: {} ***\n", title),
    }
}

pub fn render_help(config: &CertificationConfig) -> String {
    let border = format!("  +{}+", rule('-', 66));
    let row = |text: String| format!("  |  {:<64}|\n", text);

    let mut out = format!("\n{border}\n");
    out.push_str(&row("COMMANDS".to_string()));
    out.push_str(&format!("{border}\n"));
    out.push_str(&row("[1-N]   - Select a numbered choice".to_string()));
    out.push_str(&row("[0]     - Switch story theme".to_string()));
    out.push_str(&row("help    - Show this help message".to_string()));
    out.push_str(&row("status  - Show your current stats".to_string()));
    out.push_str(&row("quit    - End your session early".to_string()));
    out.push_str(&format!("{border}\n"));
    out.push_str(&row("GOAL".to_string()));
    out.push_str(&format!("{border}\n"));
    out.push_str(&row(format!(
        "Complete all {} domains to finish your training.",
        config.domain_count
    )));
    out.push_str(&row(format!(
        "Your final score reflects your mastery of {} concepts.",
        config.name
    )));
    out.push_str(&row("There is no death penalty: this is training!".to_string()));
    out.push_str(&format!("{border}\n"));
    out
}

/// Closing narrative for the ending band in the theme's voice
pub fn render_closing(summary: &SessionSummary, theme: &ThemeDefinition, width: usize) -> String {
    let name = &summary.player_name;
    let (text, narrator) = match (summary.band, theme.voice) {
        (EndingBand::Mastery, Voice::Corporate) => (
            format!(
                "Outstanding work, {}! The board is impressed. You've demonstrated \
                 mastery across all modules. {}",
                name, summary.victory_message
            ),
            "EXECUTIVE ANNOUNCEMENT",
        ),
        (EndingBand::Mastery, Voice::Fantasy) => (
            format!(
                "Congratulations, {}! You have demonstrated mastery of all domains. {}",
                name, summary.victory_message
            ),
            "THE HIGH COUNCIL",
        ),
        (EndingBand::Completion, Voice::Corporate) => (
            format!(
                "Good effort, {}. You've completed the training program. Your performance \
                 review mentions 'shows potential'. Consider reviewing the modules you \
                 struggled with.",
                name
            ),
            "HR PERFORMANCE REVIEW",
        ),
        (EndingBand::Completion, Voice::Fantasy) => (
            format!(
                "Well done, {}. You have completed your training. Your understanding shows \
                 promise, though some areas would benefit from further study.",
                name
            ),
            "THE COUNCIL OF REVIEW",
        ),
        (EndingBand::Remedial, Voice::Corporate) => (
            format!(
                "{}, we need to talk. Your training scores suggest some gaps. Review the \
                 material and consider retaking the training.",
                name
            ),
            "YOUR MANAGER",
        ),
        (EndingBand::Remedial, Voice::Fantasy) => (
            format!(
                "{}, you have walked the halls and faced the trials. While your journey is \
                 complete, the knowledge has not yet taken root. Return to your studies and \
                 attempt the trials again.",
                name
            ),
            "THE MENTORS",
        ),
    };
    render_narrative(&text, narrator, width)
}

/// Performance summary, domain breakdown and exam-readiness guidance
pub fn render_summary(summary: &SessionSummary) -> String {
    let heavy = rule('=', 60);
    let light = rule('-', 60);

    let mut out = format!("\n  {heavy}\n  TRAINING PERFORMANCE SUMMARY\n  {heavy}\n");
    out.push_str(&format!("\n  Name: {}\n", summary.player_name));
    out.push_str(&format!("  Certification: {}\n", summary.certification_name));
    out.push_str(&format!("  Final Title: {}\n", summary.title));
    out.push_str(&format!("\n  Total XP Earned: {}\n", summary.xp));
    out.push_str(&format!("  Correct Answers: {}\n", summary.correct_answers));
    out.push_str(&format!("  Incorrect Answers: {}\n", summary.wrong_answers));
    out.push_str(&format!("  Overall Accuracy: {:.1}%\n", summary.accuracy));
    out.push_str(&format!("  Performance Rating: {}\n", summary.rating));

    out.push_str(&format!("\n  {light}\n  DOMAIN BREAKDOWN\n  {light}\n"));
    for result in &summary.domains {
        let mark = if result.passed { "+" } else { "x" };
        out.push_str(&format!(
            "  {} Domain {}: {:<width$} {:>2}/{:<2} ({:>5.1}%)\n",
            mark,
            result.domain,
            truncate(&result.short_name, DOMAIN_NAME_COLUMN),
            result.correct,
            result.attempts,
            result.accuracy,
            width = DOMAIN_NAME_COLUMN,
        ));
    }

    out.push_str(&format!("\n  {heavy}\n"));
    out.push_str(&format!(
        "\n  {} EXAM READINESS\n  {light}\n",
        summary.certification_name
    ));

    let weak_list = |intro: &str| -> String {
        if summary.weak_domains.is_empty() {
            return String::new();
        }
        let mut list = format!("  {}\n", intro);
        for weak in &summary.weak_domains {
            list.push_str(&format!(
                "    - Domain {}: {} ({:.1}%)\n",
                weak.domain, weak.short_name, weak.accuracy
            ));
        }
        list
    };

    match summary.readiness {
        Readiness::StrongCandidate => {
            out.push_str("  * STRONG CANDIDATE\n");
            out.push_str("  You've demonstrated excellent mastery across all domains.\n");
            out.push_str("  Consider scheduling your exam soon while the material is fresh.\n");
        }
        Readiness::GoodFoundation => {
            out.push_str("  + GOOD FOUNDATION\n");
            out.push_str("  You have a solid understanding of the concepts.\n");
            out.push_str(&weak_list("Focus additional study on these domains:"));
        }
        Readiness::MoreStudyNeeded => {
            out.push_str("  - MORE STUDY NEEDED\n");
            out.push_str("  You're building a foundation, but need more preparation.\n");
            out.push_str(&weak_list("Prioritize these domains in your study plan:"));
        }
        Readiness::AdditionalPreparation => {
            out.push_str("  o ADDITIONAL PREPARATION RECOMMENDED\n");
            out.push_str("  Consider additional study resources and retake this training.\n");
            out.push_str(&weak_list("Start with these domains:"));
        }
    }

    out.push_str(&format!("\n  {heavy}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TitleDef;
    use crate::game::SessionSummary;

    fn config() -> CertificationConfig {
        CertificationConfig {
            name: "SEC+".to_string(),
            domain_count: 2,
            ..Default::default()
        }
    }

    #[test]
    fn wrap_respects_width_and_paragraphs() {
        let wrapped = wrap_text("one two three four\n\nfive", 9);
        assert_eq!(wrapped, "one two\n  three\n  four\n\n  five");
    }

    #[test]
    fn wrap_keeps_overlong_words_whole() {
        assert_eq!(wrap_text("supercalifragilistic ok", 5), "supercalifragilistic\n  ok");
    }

    #[test]
    fn hud_bars_scale_with_stats() {
        let mut player = Player::new("Ayla", 100, 100, 2, 1000, vec![TitleDef::new(0, "Novice")]);
        player.take_damage(50, 1);
        player.gain_xp(250, 1);

        let hud = render_hud(&player, &config(), &ThemeDefinition::builtin()[0]);

        assert!(hud.contains("SEEKER: Ayla"));
        assert!(hud.contains("[#####-----]  50/100"));
        assert!(hud.contains("[=====---------------]  25%"));
        assert!(hud.contains("DOMAIN 1: Domain 1"));
    }

    #[test]
    fn negative_hp_renders_empty_bar() {
        let mut player = Player::new("Ayla", 10, 100, 2, 1000, Vec::new());
        player.take_damage(40, 1);

        let hud = render_hud(&player, &config(), &ThemeDefinition::builtin()[1]);

        assert!(hud.contains("[----------] -30/100"));
        assert!(hud.contains("EMPLOYEE: Ayla"));
    }

    #[test]
    fn choices_show_theme_hint() {
        let out = render_choices(&["Patch", "Ignore"], true);
        assert!(out.contains("[1] Patch"));
        assert!(out.contains("[2] Ignore"));
        assert!(out.contains("[0] Switch story theme"));
        assert!(!render_choices(&["Patch"], false).contains("[0]"));
    }

    #[test]
    fn failure_shows_correct_answer_and_reference() {
        let out = render_failure("Wrong call.", 20, "Domain 1.2", 3, Some("Escalate"), 80);
        assert!(out.contains("-20 HP"));
        assert!(out.contains("[3] Escalate"));
        assert!(out.contains("[REFERENCE: Domain 1.2]"));

        let bare = render_failure("Wrong call.", 20, "", 1, None, 80);
        assert!(!bare.contains("CORRECT ANSWER"));
        assert!(!bare.contains("REFERENCE"));
    }

    #[test]
    fn closing_narrator_follows_band_and_voice() {
        let mut player = Player::new("Ayla", 100, 100, 2, 1000, Vec::new());
        player.gain_xp(50, 1);
        let summary = SessionSummary::evaluate(&player, &config(), "fantasy", "");
        let themes = ThemeDefinition::builtin();

        assert!(render_closing(&summary, &themes[0], 80).contains("[THE HIGH COUNCIL]"));
        assert!(render_closing(&summary, &themes[1], 80).contains("[EXECUTIVE ANNOUNCEMENT]"));

        player.take_damage(20, 2);
        player.take_damage(20, 2);
        let summary = SessionSummary::evaluate(&player, &config(), "fantasy", "");
        assert!(render_closing(&summary, &themes[0], 80).contains("[THE MENTORS]"));
        assert!(render_closing(&summary, &themes[1], 80).contains("[YOUR MANAGER]"));
    }

    #[test]
    fn summary_lists_weak_domains_below_ninety() {
        let mut player = Player::new("Ayla", 100, 100, 2, 1000, Vec::new());
        for _ in 0..3 {
            player.gain_xp(50, 1);
        }
        player.gain_xp(50, 2);
        player.take_damage(20, 2);

        let summary = SessionSummary::evaluate(&player, &config(), "fantasy", "");
        let out = render_summary(&summary);

        assert!(out.contains("Overall Accuracy: 80.0%"));
        assert!(out.contains("GOOD FOUNDATION"));
        assert!(out.contains("- Domain 2: Domain 2 (50.0%)"));
    }
}
