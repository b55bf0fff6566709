//! Line-oriented console front end.
//!
//! Reads one command per line, forwards it to the coordinator as an intent,
//! waits for the view to settle and prints the snapshot as a plain-text table
//! or a JSON line.

use crate::{coordinator::TableHandle, view::ViewSnapshot};
use core::{fmt::Write as _, str::FromStr};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const HELP: &str = "\
commands:
  generate          replace the dataset with freshly generated rows
  search [text]     filter rows containing text (empty clears)
  sort <field>      sort by field; repeat to flip the direction
  facet [value]     keep rows whose facet column equals value (empty clears)
  page <n>          jump to page n
  next | prev       move one page
  size <n>          change the page size
  show              print the current page again
  help              print this message
  quit              exit";

/// Widest a rendered cell may get before it is cut.
const MAX_CELL_WIDTH: usize = 36;

/// One parsed console command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Generate,
    Search(String),
    Sort(String),
    Facet(Option<String>),
    Page(usize),
    Next,
    Prev,
    Size(usize),
    Show,
    Help,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("Unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{command}` expects a positive number, got `{value}`")]
    InvalidNumber { command: &'static str, value: String },
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "generate" | "gen" => Self::Generate,
            "search" | "/" => Self::Search(rest.to_string()),
            "sort" if rest.is_empty() => {
                return Err(ParseCommandError::MissingArgument {
                    command: "sort",
                    argument: "field name",
                });
            }
            "sort" => Self::Sort(rest.to_string()),
            "facet" => Self::Facet((!rest.is_empty()).then(|| rest.to_string())),
            "page" => Self::Page(number("page", rest)?),
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "size" => Self::Size(number("size", rest)?),
            "show" | "" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(ParseCommandError::Unknown(word.to_string())),
        };
        Ok(command)
    }
}

fn number(command: &'static str, value: &str) -> Result<usize, ParseCommandError> {
    if value.is_empty() {
        return Err(ParseCommandError::MissingArgument {
            command,
            argument: "number",
        });
    }
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseCommandError::InvalidNumber {
            command,
            value: value.to_string(),
        }),
    }
}

/// What the loop does after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Driver {
    handle: TableHandle,
    page_sizes: Vec<usize>,
    json: bool,
}

impl Driver {
    pub const fn new(handle: TableHandle, page_sizes: Vec<usize>, json: bool) -> Self {
        Self {
            handle,
            page_sizes,
            json,
        }
    }

    /// Processes `input` until it ends or a `quit` command arrives.
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let flow = match line.parse::<Command>() {
                Ok(command) => self.apply(command, out).await?,
                Err(e) => {
                    out.write_all(format!("{e}\n").as_bytes()).await?;
                    Flow::Continue
                }
            };
            out.flush().await?;
            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Forwards `command`, waits for the view to settle and prints it.
    pub async fn apply<W>(&self, command: Command, out: &mut W) -> anyhow::Result<Flow>
    where
        W: AsyncWrite + Unpin,
    {
        match command {
            Command::Generate => self.handle.generate().await?,
            Command::Search(query) => self.handle.search(query).await?,
            Command::Sort(field) => self.handle.sort_by(field).await?,
            Command::Facet(value) => self.handle.select_facet(value).await?,
            Command::Page(page) => self.handle.change_page(page).await?,
            Command::Next => self.handle.next_page().await?,
            Command::Prev => self.handle.prev_page().await?,
            Command::Size(size) if self.page_sizes.contains(&size) => {
                self.handle.change_page_size(size).await?;
            }
            Command::Size(size) => {
                let message = format!("page size {size} is not one of {:?}\n", self.page_sizes);
                out.write_all(message.as_bytes()).await?;
                return Ok(Flow::Continue);
            }
            Command::Show => {}
            Command::Help => {
                out.write_all(HELP.as_bytes()).await?;
                out.write_all(b"\n").await?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        let snapshot = self.handle.settled().await?;
        let rendered = if self.json {
            let mut line = serde_json::to_string(&snapshot)?;
            line.push('\n');
            line
        } else {
            render_table(&snapshot)
        };
        out.write_all(rendered.as_bytes()).await?;
        Ok(Flow::Continue)
    }
}

/// Plain-text rendering of one snapshot: header, page rows and a status line.
pub fn render_table(snapshot: &ViewSnapshot) -> String {
    let headers: Vec<String> = snapshot
        .schema
        .fields()
        .iter()
        .map(|field| match &snapshot.sort_spec.field {
            Some(sorted) if *sorted == field.name => {
                format!("{} {}", field.label, snapshot.sort_spec.direction.arrow())
            }
            _ => field.label.clone(),
        })
        .collect();

    let rows: Vec<Vec<String>> = snapshot
        .page_rows
        .iter()
        .map(|row| {
            row.values()
                .iter()
                .map(|value| truncate(&value.render()))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    if rows.is_empty() {
        out.push_str("No results\n");
    }

    let _ = write!(
        out,
        "page {}/{} | {} of {} rows | size {}",
        snapshot.page,
        snapshot.total_pages,
        snapshot.filtered_count,
        snapshot.total_count,
        snapshot.page_size
    );
    if !snapshot.query.is_empty() {
        let _ = write!(out, " | search \"{}\"", snapshot.query);
    }
    if let Some(value) = &snapshot.facet_value {
        let _ = write!(out, " | {} = {value}", snapshot.facet_field);
    }
    if snapshot.busy {
        let _ = write!(
            out,
            " | busy ({}/{} generated)",
            snapshot.generated_rows, snapshot.target_rows
        );
    }
    out.push('\n');

    if let Some(notice) = &snapshot.notice {
        let _ = writeln!(out, "{:?}: {}", notice.kind, notice.message);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut cut: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Notice, ViewState};
    use rowpipe::{Dataset, Error, FieldDef, FieldKind, Record, Schema, SortSpec, Value};
    use std::sync::Arc;

    #[test]
    fn parses_commands() {
        assert_eq!("generate".parse::<Command>(), Ok(Command::Generate));
        assert_eq!("search  al ".parse::<Command>(), Ok(Command::Search("al".into())));
        assert_eq!("search".parse::<Command>(), Ok(Command::Search(String::new())));
        assert_eq!("SORT email".parse::<Command>(), Ok(Command::Sort("email".into())));
        assert_eq!("facet Model T".parse::<Command>(), Ok(Command::Facet(Some("Model T".into()))));
        assert_eq!("facet".parse::<Command>(), Ok(Command::Facet(None)));
        assert_eq!("page 4".parse::<Command>(), Ok(Command::Page(4)));
        assert_eq!("".parse::<Command>(), Ok(Command::Show));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(
            "dance".parse::<Command>(),
            Err(ParseCommandError::Unknown("dance".into()))
        );
        assert!(matches!(
            "sort".parse::<Command>(),
            Err(ParseCommandError::MissingArgument { command: "sort", .. })
        ));
        assert!(matches!(
            "page zero".parse::<Command>(),
            Err(ParseCommandError::InvalidNumber { .. })
        ));
        assert!("size 0".parse::<Command>().is_err());
    }

    #[test]
    fn table_marks_sort_column_and_status() {
        let schema = Schema::new(
            vec![
                FieldDef::new("id", FieldKind::Id).with_label("Id"),
                FieldDef::new("name", FieldKind::Text)
                    .with_label("Name")
                    .sortable(),
            ],
            "id",
        )
        .unwrap();
        let data = Dataset::from_records(
            Arc::new(schema),
            ["alice", "Bob"]
                .iter()
                .enumerate()
                .map(|(i, n)| Record::new(vec![Value::Id(format!("{i}")), Value::from(*n)])),
        );

        let mut view = ViewState::new(Arc::clone(data.schema()), "name", 15, 2);
        view.set_dataset(&data);
        view.set_sort_spec(SortSpec::ascending("name"));
        view.set_notice(Notice::from_error(&Error::invalid_field("age")));

        let table = render_table(&view.snapshot(false, false));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Id | Name ↑");
        assert_eq!(lines[2], "0  | alice");
        assert_eq!(lines[3], "1  | Bob");
        assert_eq!(lines[4], "page 1/1 | 2 of 2 rows | size 15");
        assert_eq!(lines[5], "Warning: Invalid field: age");
    }

    #[test]
    fn empty_page_says_no_results() {
        let schema = Schema::new(
            vec![FieldDef::new("id", FieldKind::Id).with_label("Id")],
            "id",
        )
        .unwrap();
        let view = ViewState::new(Arc::new(schema), "id", 15, 0);

        let table = render_table(&view.snapshot(false, false));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Id");
        assert_eq!(lines[2], "No results");
        assert_eq!(lines[3], "page 1/1 | 0 of 0 rows | size 15");
    }

    #[test]
    fn long_cells_are_cut() {
        let long = "x".repeat(50);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_WIDTH);
        assert!(cut.ends_with('…'));
    }
}
