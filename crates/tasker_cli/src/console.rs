use crate::render;
use std::io::{BufRead, Write};
use tasker_core::error::AppError;
use tasker_core::model::Task;
use tasker_core::prompt::{Menu, Prompt, menu_text};
use tasker_core::stats::Statistics;
use time::UtcOffset;

const TITLE: &str = "=== TASKER ===";

/// Line-oriented [`Prompt`] over any reader/writer pair, normally the locked
/// stdin and stdout. Dates are read and shown at `offset`.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
    offset: UtcOffset,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W, offset: UtcOffset) -> Self {
        Self {
            input,
            output,
            offset,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write_line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.output, "{text}") {
            tracing::debug!(target: "tasks", "could not write to the console: {err}");
        }
    }
}

/// Drops the line terminator only, so a lone space survives.
fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn ask(&mut self, question: &str) -> Result<String, AppError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        // Bytes that are not UTF-8 become U+FFFD and fail validation later.
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            self.write_line("");
            return Err(AppError::input_closed());
        }
        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        strip_line_ending(&mut line);
        Ok(line)
    }

    fn say(&mut self, text: &str) {
        self.write_line(text);
    }

    fn offset(&self) -> UtcOffset {
        self.offset
    }

    fn show_menu(&mut self, menu: Menu) {
        if menu == Menu::Main {
            self.write_line("");
            self.write_line(TITLE);
        }
        self.write_line(menu_text(menu));
    }

    fn show_tasks(&mut self, tasks: &[Task]) {
        for (index, task) in tasks.iter().enumerate() {
            self.write_line(&format!("Task #[{}]: {}", index + 1, task.name()));
        }
    }

    fn show_statistics(&mut self, stats: &Statistics) {
        let table = render::statistics_table(stats);
        self.write_line(&table);
    }
}

#[cfg(test)]
mod tests {
    use super::{ConsolePrompt, strip_line_ending};
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tasker_core::model::Task;
    use tasker_core::prompt::{Menu, Prompt};
    use tasker_core::storage::json_store;
    use tasker_core::task_api::{TaskStore, run_session};
    use time::UtcOffset;
    use time::macros::offset;

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasker-{nanos}-{file_name}"))
    }

    fn console(input: &[u8]) -> ConsolePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePrompt::new(Cursor::new(input.to_vec()), Vec::new(), UtcOffset::UTC)
    }

    #[test]
    fn strip_line_ending_keeps_spaces() {
        let mut line = " \r\n".to_string();
        strip_line_ending(&mut line);
        assert_eq!(line, " ");

        let mut line = "no newline".to_string();
        strip_line_ending(&mut line);
        assert_eq!(line, "no newline");
    }

    #[test]
    fn ask_reads_lines_until_end_of_input() {
        let mut prompt = console(b"1\n \n");

        assert_eq!(prompt.ask("Option: ").unwrap(), "1");
        assert_eq!(prompt.ask("Description: ").unwrap(), " ");
        assert!(prompt.ask("Option: ").unwrap_err().is_input_closed());

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert!(output.starts_with("Option: Description: "));
    }

    #[test]
    fn ask_replaces_invalid_utf8() {
        let mut prompt = console(b"\xff\xfe\nok\n");

        assert_eq!(prompt.ask("Option: ").unwrap(), "\u{FFFD}\u{FFFD}");
        assert_eq!(prompt.ask("Option: ").unwrap(), "ok");
    }

    #[test]
    fn session_survives_invalid_utf8_and_saves() {
        let path = temp_path("console-invalid-utf8.json");
        let mut store = TaskStore::open(&path);
        store.add(Task::new("Buy milk", None));
        let mut prompt = console(b"\xff\xfe\n\n0\n");

        run_session(&mut store, &mut prompt).unwrap();
        let loaded = json_store::load_tasks(&path);
        std::fs::remove_file(&path).ok();

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert!(output.contains("-INVALID OPTION-"));
        assert!(output.contains("See you next time!"));
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "Buy milk");
    }

    #[test]
    fn menus_and_lists_are_written() {
        let mut prompt = console(b"");
        prompt.show_menu(Menu::Main);
        prompt.show_tasks(&[Task::new("Buy milk", None)]);

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert!(output.contains("=== TASKER ==="));
        assert!(output.contains("[0] Exit"));
        assert!(output.contains("Task #[1]: Buy milk"));
    }

    #[test]
    fn configured_offset_is_reported() {
        let prompt = ConsolePrompt::new(Cursor::new(Vec::new()), Vec::new(), offset!(+5));
        assert_eq!(prompt.offset(), offset!(+5));
    }
}
