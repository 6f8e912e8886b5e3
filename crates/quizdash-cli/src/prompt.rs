use quizdash_core::questions::{Answer, Question};
use quizdash_platformer::FrameInput;

/// A line typed while the game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Input(FrameInput),
    Restart,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let input = match line.trim().to_lowercase().as_str() {
            "a" | "left" => FrameInput {
                left: true,
                ..FrameInput::default()
            },
            "d" | "right" => FrameInput {
                right: true,
                ..FrameInput::default()
            },
            "w" | "jump" => FrameInput {
                jump: true,
                ..FrameInput::default()
            },
            "f" | "attack" => FrameInput {
                attack: true,
                ..FrameInput::default()
            },
            "p" | "pause" => FrameInput {
                toggle_pause: true,
                ..FrameInput::default()
            },
            "b" | "debug" => FrameInput {
                toggle_debug: true,
                ..FrameInput::default()
            },
            "r" | "restart" => return Some(Self::Restart),
            "q" | "quit" => return Some(Self::Quit),
            _ => return None,
        };
        Some(Self::Input(input))
    }
}

/// Merge two inputs, keeping every pressed flag.
pub fn merge(a: FrameInput, b: FrameInput) -> FrameInput {
    FrameInput {
        left: a.left || b.left,
        right: a.right || b.right,
        jump: a.jump || b.jump,
        attack: a.attack || b.attack,
        toggle_pause: a.toggle_pause != b.toggle_pause,
        toggle_debug: a.toggle_debug != b.toggle_debug,
    }
}

/// Text shown when a checkpoint question is posed.
pub fn format_question(question: &Question) -> String {
    let mut out = format!("\n? {}\n", question.prompt());
    for (i, option) in question.options().iter().enumerate() {
        out.push_str(&format!("  {}) {option}\n", i + 1));
    }
    out.push_str("answer (empty line to skip): ");
    out
}

/// Interpret a typed line as an answer. An empty line dismisses the prompt;
/// a number picks a multiple-choice option (1-based); anything else is text.
pub fn parse_answer(line: &str, question: &Question) -> Answer {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Answer::Dismissed;
    }
    if !question.options().is_empty()
        && let Ok(n) = line.trim().parse::<usize>()
        && n >= 1
    {
        return Answer::Choice(n - 1);
    }
    Answer::Text(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdash_core::test_helpers::sample_bank;

    #[test]
    fn commands_map_to_inputs() {
        assert_eq!(
            Command::parse("jump"),
            Some(Command::Input(FrameInput {
                jump: true,
                ..FrameInput::default()
            }))
        );
        assert_eq!(
            Command::parse(" P "),
            Some(Command::Input(FrameInput {
                toggle_pause: true,
                ..FrameInput::default()
            }))
        );
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("restart"), Some(Command::Restart));
        assert_eq!(Command::parse("dance"), None);
    }

    #[test]
    fn merge_keeps_held_keys_and_cancels_double_toggles() {
        let pause = FrameInput {
            toggle_pause: true,
            ..FrameInput::default()
        };
        let run = FrameInput {
            right: true,
            ..FrameInput::default()
        };
        let merged = merge(run, pause);
        assert!(merged.right && merged.toggle_pause);
        assert!(!merge(pause, pause).toggle_pause);
    }

    #[test]
    fn numeric_answer_picks_option() {
        let bank = sample_bank();
        let q = bank.get(3).unwrap();
        assert_eq!(parse_answer("2\n", q), Answer::Choice(1));
        assert!(q.is_correct(&parse_answer("2", q)));
    }

    #[test]
    fn numbers_are_text_for_free_text_questions() {
        let q = Question::FreeText {
            question: "Answer to everything?".to_string(),
            answer: "42".to_string(),
        };
        assert_eq!(parse_answer("42", &q), Answer::Text("42".to_string()));
        assert!(q.is_correct(&parse_answer("42", &q)));
    }

    #[test]
    fn empty_line_dismisses() {
        let bank = sample_bank();
        let q = bank.get(0).unwrap();
        assert_eq!(parse_answer("\n", q), Answer::Dismissed);
        assert_eq!(parse_answer("   ", q), Answer::Dismissed);
    }

    #[test]
    fn text_answer_keeps_inner_spacing() {
        let bank = sample_bank();
        let q = bank.get(0).unwrap();
        assert!(q.is_correct(&parse_answer("paris\r\n", q)));
        assert!(!q.is_correct(&parse_answer(" paris", q)));
    }

    #[test]
    fn question_text_lists_options() {
        let bank = sample_bank();
        let text = format_question(bank.get(3).unwrap());
        assert!(text.contains("2 + 2?"));
        assert!(text.contains("  1) "));
        assert!(text.contains("  2) "));
    }
}
