#[cfg(feature = "tracing_debug")]
use tracing::debug;

pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, message: String);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        print!("{message}");
    }

    fn print_error(&self, message: String) {
        eprint!("{message}");
    }
}

/// Greedily fill lines of at most `width` characters.
/// Words are never split: a word longer than `width` gets a line to itself.
/// Existing line breaks are kept.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = std::cmp::max(width, 1);
    let mut lines = Vec::default();

    for paragraph in text.split('\n') {
        let before = lines.len();
        chunk(paragraph, width, &mut lines);

        if lines.len() == before {
            lines.push(String::default());
        }
    }

    lines
}

fn chunk(paragraph: &str, width: usize, lines: &mut Vec<String>) {
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + word.chars().count() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        if current.chars().count() > width {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Word '{current}' overflows the width {width}.");
            }
        }

        lines.push(current);
    }
}

#[cfg(test)]
pub(crate) mod util {
    use crate::parser::UserInterface;
    use std::sync::mpsc;

    pub(crate) fn channel_interface() -> (SenderInterface, ReceiverInterface) {
        let (message_tx, message_rx) = mpsc::channel();
        let (error_tx, error_rx) = mpsc::channel();
        let sender = SenderInterface {
            message_tx,
            error_tx,
        };
        let receiver = ReceiverInterface {
            message_rx,
            error_rx,
        };
        (sender, receiver)
    }

    pub(crate) struct SenderInterface {
        message_tx: mpsc::Sender<String>,
        error_tx: mpsc::Sender<String>,
    }

    impl UserInterface for SenderInterface {
        fn print(&self, message: String) {
            // Allows for print() to be called many times, with the receiver concatenating the messages.
            self.message_tx.send(message).unwrap();
        }

        fn print_error(&self, message: String) {
            self.error_tx.send(message).unwrap();
        }
    }

    pub(crate) struct ReceiverInterface {
        message_rx: mpsc::Receiver<String>,
        error_rx: mpsc::Receiver<String>,
    }

    impl ReceiverInterface {
        /// Take everything printed so far.
        pub(crate) fn consume(&self) -> (Option<String>, Option<String>) {
            (drain(&self.message_rx), drain(&self.error_rx))
        }

        pub(crate) fn consume_message(&self) -> String {
            let (message, error) = self.consume();
            assert_eq!(error, None);
            message.unwrap()
        }

        pub(crate) fn consume_error(&self) -> String {
            let (message, error) = self.consume();
            assert_eq!(message, None);
            error.unwrap()
        }
    }

    fn drain(receiver: &mpsc::Receiver<String>) -> Option<String> {
        let values: Vec<String> = receiver.try_iter().collect();

        if values.is_empty() {
            None
        } else {
            Some(values.concat())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 10, vec![""])]
    #[case("abc", 10, vec!["abc"])]
    #[case("abc def", 7, vec!["abc def"])]
    #[case("abc def", 6, vec!["abc", "def"])]
    #[case("abc   def  ghi", 7, vec!["abc def", "ghi"])]
    #[case("abcdefghijk lm", 5, vec!["abcdefghijk", "lm"])]
    #[case("a b\nc", 10, vec!["a b", "c"])]
    #[case("a\n\nb", 10, vec!["a", "", "b"])]
    #[case("abc", 0, vec!["abc"])]
    fn wrap_lines(#[case] text: &str, #[case] width: usize, #[case] expected: Vec<&str>) {
        assert_eq!(wrap(text, width), expected);
    }

    #[test]
    fn wrap_never_exceeds_width() {
        let text = "The quick brown fox jumps over the lazy dog and keeps on running far away.";

        for width in 7..30 {
            for line in wrap(text, width) {
                assert!(line.len() <= width, "'{line}' exceeds {width}");
            }
        }
    }

    #[test]
    fn channel_interface_collects() {
        // Setup
        let (sender, receiver) = util::channel_interface();

        // Execute
        sender.print("abc\n".to_string());
        sender.print("def\n".to_string());

        // Verify
        assert_eq!(receiver.consume_message(), "abc\ndef\n");
        assert_eq!(receiver.consume(), (None, None));

        sender.print_error("oops\n".to_string());
        assert_eq!(receiver.consume_error(), "oops\n");
    }
}
