//! Argument classification.
//!
//! Arguments are split into short mode flags and a single free-text input. A
//! token is a flag when it contains `-` and is shorter than three characters,
//! so `-s` and `-q` are flags while `-something` is text. Classification stops
//! at the first text token; anything after it is ignored.

use crate::error::Error;
use crate::mode::Mode;

/// Longest token, in characters, still treated as a flag.
const MAX_FLAG_LEN: usize = 2;

/// The flags and input of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub flags: Vec<String>,
    pub input: String,
}

impl Invocation {
    /// The mode selected by the flags. `-s` wins over `-q` when both appear.
    pub fn mode(&self) -> Option<Mode> {
        [Mode::Proofread, Mode::Question]
            .into_iter()
            .find(|mode| self.has_flag(mode.flag()))
    }

    /// Like [`Invocation::mode`] but reports a usage error when no mode is selected.
    pub fn require_mode(&self) -> Result<Mode, Error> {
        self.mode().ok_or_else(|| {
            let reason = match self.flags.iter().find(|f| !is_known_flag(f)) {
                Some(flag) => format!("unrecognized option '{}'", flag),
                None => "no mode selected".to_string(),
            };
            Error::Usage(format!("{}\n\n{}", reason, usage()))
        })
    }

    fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// Whether `arg` is classified as a flag.
pub fn is_flag(arg: &str) -> bool {
    arg.contains('-') && arg.chars().count() <= MAX_FLAG_LEN
}

fn is_known_flag(arg: &str) -> bool {
    arg == Mode::Proofread.flag() || arg == Mode::Question.flag()
}

/// Split arguments (program name excluded) into flags and the input text.
pub fn classify<I, S>(args: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut invocation = Invocation::default();
    for arg in args {
        let arg = arg.as_ref();
        if is_flag(arg) {
            invocation.flags.push(arg.to_string());
            continue;
        }
        invocation.input = arg.to_string();
        break;
    }
    invocation
}

/// Usage text shown on misuse.
pub fn usage() -> String {
    format!(
        "Usage: quill [-s|-q] <text>\n\n  \
         {}  proofread <text>, print the result and copy it to the clipboard\n  \
         {}  ask a short programming question",
        Mode::Proofread.flag(),
        Mode::Question.flag()
    )
}
