//! Interactive budgeting session
//!
//! A [`Session`] owns one [`BudgetState`] and executes session commands
//! against it, writing results to its output. The interactive shell and the
//! script runner both feed lines through [`Session::execute_line`].

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, warn};

use super::commands::{split_line, AssetCommands, SessionCommand, SessionLine};
use crate::config::settings::{Settings, MAX_PROJECTION_MONTHS};
use crate::display::{
    format_asset_list, format_label_list, format_node_tree, format_visualization,
};
use crate::error::{CashflowError, CashflowResult};
use crate::export::{export_flow_csv, export_json, export_projection_csv, export_yaml, ExportFormat};
use crate::models::{Money, NodeGroup};
use crate::services::{BudgetState, NodeEdit};

/// Prompt shown by the interactive shell
pub const PROMPT: &str = "cashflow> ";

/// What the caller should do after a line was executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A failed script line
#[derive(Debug)]
pub struct LineFailure {
    pub line: usize,
    pub error: CashflowError,
}

/// Result of running a script
#[derive(Debug, Default)]
pub struct ScriptOutcome {
    /// Lines that held a command
    pub executed: usize,
    pub failures: Vec<LineFailure>,
}

impl ScriptOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn parse_money(text: &str) -> CashflowResult<Money> {
    Money::parse(text)
        .map_err(|e| CashflowError::Validation(format!("Invalid amount '{}': {}", text, e)))
}

/// Parse a group a user may assign to a node
fn parse_group(text: &str) -> CashflowResult<NodeGroup> {
    let group: NodeGroup = text.parse()?;
    if !NodeGroup::assignable().contains(&group) {
        return Err(CashflowError::Validation(format!(
            "Group '{}' is reserved and cannot be assigned",
            group
        )));
    }
    Ok(group)
}

fn write_err(e: std::io::Error) -> CashflowError {
    CashflowError::Io(e.to_string())
}

/// One budgeting session writing to `W`
pub struct Session<W: Write> {
    state: BudgetState,
    settings: Settings,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(settings: Settings, out: W) -> Self {
        Self {
            state: BudgetState::new(),
            settings,
            out,
        }
    }

    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Consume the session and return its output
    pub fn into_output(self) -> W {
        self.out
    }

    fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(self.symbol())
    }

    fn projection_months(&self, months: Option<u32>) -> CashflowResult<u32> {
        let months = months.unwrap_or(self.settings.default_projection_months);
        if months > MAX_PROJECTION_MONTHS {
            return Err(CashflowError::Validation(format!(
                "Projection horizon must be at most {} months, got {}",
                MAX_PROJECTION_MONTHS, months
            )));
        }
        Ok(months)
    }

    fn print(&mut self, text: &str) -> CashflowResult<()> {
        self.out.write_all(text.as_bytes()).map_err(write_err)
    }

    fn println(&mut self, text: &str) -> CashflowResult<()> {
        writeln!(self.out, "{}", text).map_err(write_err)
    }

    /// Print the over-allocation warning, if any, after a mutation
    fn report_warnings(&mut self) -> CashflowResult<()> {
        let warnings = self.state.metrics()?.check_over_allocations();
        if !warnings.is_empty() {
            let message = format!("Warning: Over-allocation detected in: {}", warnings.join(", "));
            self.println(&message)?;
        }
        Ok(())
    }

    /// Execute one line of session input
    ///
    /// Blank lines and comments do nothing. Help requests print clap's help
    /// text; any other parse error is a validation error.
    pub fn execute_line(&mut self, line: &str) -> CashflowResult<Flow> {
        let words = split_line(line)?;
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        match SessionLine::try_parse_from(&words) {
            Ok(parsed) => self.execute(parsed.command),
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                | ErrorKind::DisplayVersion => {
                    self.print(&e.to_string())?;
                    Ok(Flow::Continue)
                }
                _ => {
                    let message = e.to_string();
                    let first = message
                        .lines()
                        .next()
                        .unwrap_or_default()
                        .trim_start_matches("error: ")
                        .to_string();
                    Err(CashflowError::Validation(first))
                }
            },
        }
    }

    /// Execute a parsed command
    pub fn execute(&mut self, command: SessionCommand) -> CashflowResult<Flow> {
        debug!(?command, "executing session command");

        match command {
            SessionCommand::Start { income } => {
                let income = parse_money(&income)?;
                self.state.start(income)?;
                let message = format!("Budget started with {} planned income", self.money(income));
                self.println(&message)?;
            }

            SessionCommand::Income { amount } => {
                let amount = parse_money(&amount)?;
                self.state.edit_income(amount)?;
                let message = format!("Planned income set to {}", self.money(amount));
                self.println(&message)?;
                self.report_warnings()?;
            }

            SessionCommand::Add {
                parent,
                label,
                amount,
                group,
                apr,
                balance,
            } => {
                let amount = parse_money(&amount)?;
                let group = parse_group(&group)?;
                let balance = balance.as_deref().map(parse_money).transpose()?;

                self.state.add_node(
                    &parent,
                    &label,
                    amount,
                    group,
                    apr.unwrap_or(0.0),
                    balance.unwrap_or_default(),
                )?;
                let message = format!(
                    "Added {} ({} from {})",
                    label.trim(),
                    self.money(amount),
                    parent.trim()
                );
                self.println(&message)?;
                self.report_warnings()?;
            }

            SessionCommand::Edit {
                label,
                name,
                amount,
                group,
                apr,
                balance,
            } => {
                let edit = NodeEdit {
                    new_label: name,
                    new_amount: amount.as_deref().map(parse_money).transpose()?,
                    new_group: group.as_deref().map(parse_group).transpose()?,
                    apr,
                    current_balance: balance.as_deref().map(parse_money).transpose()?,
                };

                if edit.is_empty() {
                    self.state
                        .tree()?
                        .find(label.trim())
                        .ok_or_else(|| CashflowError::node_not_found(label.trim()))?;
                    let message = format!("Nothing to change for {}", label);
                    self.println(&message)?;
                    return Ok(Flow::Continue);
                }

                let id = self.state.edit_node(&label, &edit)?;
                let current = self
                    .state
                    .tree()?
                    .node(id)
                    .map(|n| n.label.clone())
                    .unwrap_or(label);
                self.println(&format!("Updated {}", current))?;
                self.report_warnings()?;
            }

            SessionCommand::Remove { label } => {
                let removed = self.state.remove_node(&label)?;
                self.println(&format!("Removed: {}", removed.join(", ")))?;
                self.report_warnings()?;
            }

            SessionCommand::Nodes => {
                let labels = self.state.list_node_labels()?;
                self.print(&format_label_list(&labels))?;
            }

            SessionCommand::Tree => {
                let text = format_node_tree(
                    self.state.tree()?,
                    self.state.planned_income(),
                    self.symbol(),
                );
                self.print(&text)?;
            }

            SessionCommand::Asset(AssetCommands::Add { name, value }) => {
                let value = parse_money(&value)?;
                self.state.add_asset(&name, value)?;
                let message = format!("Added asset {} ({})", name.trim(), self.money(value));
                self.println(&message)?;
            }

            SessionCommand::Asset(AssetCommands::Remove { name }) => {
                let asset = self.state.remove_asset(&name)?;
                self.println(&format!("Removed asset {}", asset.name))?;
            }

            SessionCommand::Assets => {
                let text = format_asset_list(self.state.list_assets()?, self.symbol());
                self.print(&text)?;
            }

            SessionCommand::Show { months } => {
                let months = self.projection_months(months)?;
                let viz = self.state.visualization(months)?;
                let text = format_visualization(&viz, self.symbol());
                self.print(&text)?;
            }

            SessionCommand::Warnings => {
                let warnings = self.state.metrics()?.check_over_allocations();
                if warnings.is_empty() {
                    self.println("No over-allocations.")?;
                } else {
                    self.println("Over-allocated:")?;
                    for label in warnings {
                        self.println(&format!("  {}", label))?;
                    }
                }
            }

            SessionCommand::Export { target, months } => {
                let (format, path) = match target.as_slice() {
                    [path] => (self.settings.default_export_format, PathBuf::from(path)),
                    [format, path] => (format.parse::<ExportFormat>()?, PathBuf::from(path)),
                    _ => {
                        return Err(CashflowError::Validation(
                            "Usage: export [FORMAT] <PATH>".into(),
                        ))
                    }
                };
                let months = self.projection_months(months)?;
                self.export(format, &path, months)?;
                let message = format!("Exported {} to {}", format, path.display());
                self.println(&message)?;
            }

            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Write the visualization payload to `path`
    ///
    /// CSV holds the projection series when `months > 0` and a savings leaf
    /// exists, otherwise the flow links.
    fn export(&self, format: ExportFormat, path: &Path, months: u32) -> CashflowResult<()> {
        let viz = self.state.visualization(months)?;

        let file = File::create(path).map_err(|e| {
            CashflowError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);

        match format {
            ExportFormat::Json => export_json(&viz, &mut writer)?,
            ExportFormat::Yaml => export_yaml(&viz, &mut writer)?,
            ExportFormat::Csv => match &viz.projection {
                Some(projection) => export_projection_csv(projection, &mut writer)?,
                None => export_flow_csv(&viz.flow_graph, &mut writer)?,
            },
        }

        writer
            .flush()
            .map_err(|e| CashflowError::Export(e.to_string()))?;
        debug!(%format, path = %path.display(), months, "exported visualization");
        Ok(())
    }

    /// Run a script, one command per line
    ///
    /// Stops at the first failing line unless `continue_on_error` is set.
    /// A `quit` line ends the script early.
    pub fn run_script<R: BufRead>(
        &mut self,
        reader: R,
        continue_on_error: bool,
    ) -> CashflowResult<ScriptOutcome> {
        let mut outcome = ScriptOutcome::default();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let number = i + 1;
            if split_line(&line).map(|w| w.is_empty()).unwrap_or(false) {
                continue;
            }
            outcome.executed += 1;

            match self.execute_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(error) => {
                    warn!(line = number, %error, "script command failed");
                    outcome.failures.push(LineFailure {
                        line: number,
                        error,
                    });
                    if !continue_on_error {
                        break;
                    }
                }
            }
        }

        Ok(outcome)
    }

    /// Run the interactive shell until `quit` or end of input
    ///
    /// Errors are written to `errors` and the shell keeps going.
    pub fn run_shell<R: BufRead, E: Write>(
        &mut self,
        mut input: R,
        prompt: bool,
        errors: &mut E,
    ) -> CashflowResult<()> {
        let mut line = String::new();

        loop {
            if prompt {
                self.print(PROMPT)?;
                self.out.flush().map_err(write_err)?;
            }

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }

            match self.execute_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => writeln!(errors, "Error: {}", e).map_err(write_err)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn session() -> Session<Vec<u8>> {
        Session::new(Settings::default(), Vec::new())
    }

    fn output(session: Session<Vec<u8>>) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_start_and_add() {
        let mut s = session();
        s.execute_line("start 5000").unwrap();
        s.execute_line("add Income Rent 1500 --group expense").unwrap();
        s.execute_line(r#"add Income "Emergency Fund" 500 -g savings --apr 3 --balance 1000"#)
            .unwrap();

        assert_eq!(
            s.state().list_node_labels().unwrap(),
            vec!["Emergency Fund", "Income", "Rent"]
        );
        let text = output(s);
        assert!(text.contains("Budget started with $5000.00 planned income"));
        assert!(text.contains("Added Rent ($1500.00 from Income)"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let mut s = session();
        assert_eq!(s.execute_line("").unwrap(), Flow::Continue);
        assert_eq!(s.execute_line("   # nothing here").unwrap(), Flow::Continue);
        assert!(!s.state().is_started());
    }

    #[test]
    fn test_errors_leave_state_unchanged() {
        let mut s = session();
        assert!(matches!(s.execute_line("add Income Rent 100"), Err(CashflowError::NotStarted)));

        s.execute_line("start 1000").unwrap();
        s.execute_line("add Income Rent 100").unwrap();
        let err = s.execute_line("add Income Rent 200").unwrap_err();
        assert!(err.is_duplicate_label());
        assert!(matches!(
            s.execute_line("add Income Gym -5"),
            Err(CashflowError::InvalidAmount(_))
        ));
        assert!(s.execute_line("add Income Gym abc").unwrap_err().is_validation());
        assert!(s.execute_line("add Income Gym 5 --group other").unwrap_err().is_validation());
        assert!(s.execute_line("add Income Gym 5 --group income").unwrap_err().is_validation());
        assert!(matches!(s.execute_line("start 2000"), Err(CashflowError::AlreadyStarted)));

        assert_eq!(s.state().list_node_labels().unwrap(), vec!["Income", "Rent"]);
    }

    #[test]
    fn test_unknown_command() {
        let mut s = session();
        let err = s.execute_line("frobnicate").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_help_prints_usage() {
        let mut s = session();
        assert_eq!(s.execute_line("help").unwrap(), Flow::Continue);
        let text = output(s);
        assert!(text.contains("start"));
        assert!(text.contains("export"));
    }

    #[test]
    fn test_over_allocation_warning_after_mutation() {
        let mut s = session();
        s.execute_line("start 1000").unwrap();
        s.execute_line("add Income Rent 1200 --group expense").unwrap();
        s.execute_line("warnings").unwrap();

        let text = output(s);
        assert!(text.contains("Warning: Over-allocation detected in: Overall budget"));
        assert!(text.contains("Over-allocated:\n  Overall budget\n"));
    }

    #[test]
    fn test_edit_and_remove() {
        let mut s = session();
        s.execute_line("start 3000").unwrap();
        s.execute_line("add Income Bills 300").unwrap();
        s.execute_line("add Bills Power 100 --group expense").unwrap();
        s.execute_line("edit Bills --name Utilities --amount 400").unwrap();
        s.execute_line("edit Power").unwrap();
        assert!(s.execute_line("edit Missing").unwrap_err().is_unknown_label());
        s.execute_line("remove Utilities").unwrap();

        assert_eq!(s.state().list_node_labels().unwrap(), vec!["Income"]);
        let text = output(s);
        assert!(text.contains("Updated Utilities"));
        assert!(text.contains("Nothing to change for Power"));
        assert!(text.contains("Removed: Utilities, Power"));
    }

    #[test]
    fn test_root_is_protected() {
        let mut s = session();
        s.execute_line("start 3000").unwrap();
        assert!(matches!(
            s.execute_line("remove Income"),
            Err(CashflowError::ProtectedRootOperation(_))
        ));
    }

    #[test]
    fn test_assets() {
        let mut s = session();
        s.execute_line("start 3000").unwrap();
        s.execute_line(r#"asset add "House" 300000"#).unwrap();
        assert!(s.execute_line("asset add House 1").unwrap_err().is_duplicate_label());
        s.execute_line("assets").unwrap();
        s.execute_line("asset remove House").unwrap();
        assert!(s.execute_line("asset remove House").unwrap_err().is_unknown_label());

        let text = output(s);
        assert!(text.contains("Standalone Assets:\n  House: $300,000\n"));
        assert!(text.contains("Removed asset House"));
    }

    #[test]
    fn test_show_months_limit() {
        let mut s = session();
        s.execute_line("start 3000").unwrap();
        s.execute_line("add Income Save 100 --group savings --balance 50").unwrap();
        s.execute_line("show --months 12").unwrap();
        assert!(s.execute_line("show --months 241").unwrap_err().is_validation());

        let text = output(s);
        assert!(text.contains("Budget Summary"));
        assert!(text.contains("Savings Projection (12 months)"));
    }

    #[test]
    fn test_export_formats() {
        let dir = TempDir::new().unwrap();
        let mut s = session();
        s.execute_line("start 2000").unwrap();
        s.execute_line("add Income Rent 1500 --group expense").unwrap();
        s.execute_line("add Income Save 100 --group savings --balance 50").unwrap();

        let json = dir.path().join("out.json");
        s.execute_line(&format!("export \"{}\"", json.display())).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(value["visualization"]["summary"]["planned_income"], 200_000);

        let flow = dir.path().join("flow.csv");
        s.execute_line(&format!("export csv \"{}\"", flow.display())).unwrap();
        let text = std::fs::read_to_string(&flow).unwrap();
        assert!(text.starts_with("Source,Target,Amount,Target Group"));

        let projection = dir.path().join("projection.csv");
        s.execute_line(&format!("export csv \"{}\" --months 2", projection.display()))
            .unwrap();
        let text = std::fs::read_to_string(&projection).unwrap();
        assert!(text.starts_with("Month,Save,Total"));

        let yaml = dir.path().join("out.yaml");
        s.execute_line(&format!("export yaml \"{}\"", yaml.display())).unwrap();
        assert!(std::fs::read_to_string(&yaml).unwrap().starts_with("# Cashflow"));

        assert!(s.execute_line("export pdf out.pdf").unwrap_err().is_validation());
    }

    #[test]
    fn test_run_script_stops_on_error() {
        let script = "start 1000\nadd Income Rent 100\nadd Income Rent 100\nadd Income Gym 50\n";
        let mut s = session();
        let outcome = s.run_script(Cursor::new(script), false).unwrap();
        assert_eq!(outcome.executed, 3);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].line, 3);
        assert!(!s.state().list_node_labels().unwrap().contains(&"Gym".to_string()));
    }

    #[test]
    fn test_run_script_continue_on_error() {
        let script = "# budget\nstart 1000\n\nadd Income Rent 100\nadd Income Rent 100\nadd Income Gym 50\nquit\nadd Income Late 1\n";
        let mut s = session();
        let outcome = s.run_script(Cursor::new(script), true).unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.failures[0].line, 5);
        assert_eq!(outcome.executed, 5);
        assert_eq!(
            s.state().list_node_labels().unwrap(),
            vec!["Gym", "Income", "Rent"]
        );
    }

    #[test]
    fn test_run_shell() {
        let mut s = session();
        let mut errors = Vec::new();
        s.run_shell(Cursor::new("start 100\nbogus\ntree\nquit\ntree\n"), true, &mut errors)
            .unwrap();

        let errors = String::from_utf8(errors).unwrap();
        assert_eq!(errors.lines().count(), 1);
        assert!(errors.starts_with("Error: Validation error:"));

        let text = output(s);
        assert!(text.starts_with(PROMPT));
        assert_eq!(text.matches("Income ($100 planned, $0 allocated)").count(), 1);
    }
}
