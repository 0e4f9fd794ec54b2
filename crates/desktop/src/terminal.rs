//! Line-oriented front end for [`OrderForm`].

use rust_decimal::Decimal;
use thiserror::Error;

use crmdesk_client::CrmApi;
use crmdesk_sales::{LineError, LineField};
use crmdesk_select::ResultsView;

use crate::session::{OrderForm, Picker, UnknownPicker};

pub const HELP: &str = "\
commands:
  token <value>            sign in
  load                     fetch reference data
  list <field>             open a field's list
  find <field> [text]      type into a field
  pick <field> <n>         choose row n of a field's list
  price <line> <amount>    set a line's unit price
  qty <line> <amount>      set a line's quantity
  rm <line>                remove a line
  paid <amount>            amount received from the customer
  show                     print the order
  save | conduct           submit unposted | submit and post
  quit
fields: org, warehouse, cash, price, product, customer";

/// Placeholder row of an open list without matches.
pub const NOTHING_FOUND: &str = "Nothing found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Token(String),
    Load,
    List(Picker),
    Find(Picker, String),
    /// Zero-based row.
    Pick(Picker, usize),
    /// Zero-based line.
    Edit(usize, LineField, Decimal),
    Remove(usize),
    Paid(String),
    Show,
    Submit { conduct: bool },
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("type a command, or `help`")]
    Empty,
    #[error("unknown command {0:?}; try `help`")]
    Unknown(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("{0:?} is not a valid number")]
    InvalidNumber(String),
    #[error(transparent)]
    UnknownPicker(#[from] UnknownPicker),
}

/// Rows and lines are numbered from 1 on screen.
fn one_based(raw: Option<&str>, what: &'static str) -> Result<usize, CommandError> {
    let raw = raw.ok_or(CommandError::MissingArgument(what))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::InvalidNumber(raw.to_string())),
    }
}

fn amount(raw: Option<&str>) -> Result<Decimal, CommandError> {
    let raw = raw.ok_or(CommandError::MissingArgument("amount"))?;
    raw.replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}

fn picker(raw: Option<&str>) -> Result<Picker, CommandError> {
    Ok(raw.ok_or(CommandError::MissingArgument("field"))?.parse()?)
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let mut args = rest.split_whitespace();

    match verb.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "help" | "?" => Ok(Command::Help),
        "token" if rest.is_empty() => Err(CommandError::MissingArgument("token")),
        "token" => Ok(Command::Token(rest.to_string())),
        "load" => Ok(Command::Load),
        "list" => Ok(Command::List(picker(args.next())?)),
        "find" => {
            let field = picker(args.next())?;
            let text = rest
                .split_once(char::is_whitespace)
                .map(|(_, text)| text.trim())
                .unwrap_or("");
            Ok(Command::Find(field, text.to_string()))
        }
        "pick" => {
            let field = picker(args.next())?;
            Ok(Command::Pick(field, one_based(args.next(), "row")?))
        }
        "price" | "qty" => {
            let field = if verb.eq_ignore_ascii_case("price") {
                LineField::UnitPrice
            } else {
                LineField::Quantity
            };
            let index = one_based(args.next(), "line")?;
            Ok(Command::Edit(index, field, amount(args.next())?))
        }
        "rm" | "remove" => Ok(Command::Remove(one_based(args.next(), "line")?)),
        "paid" => Ok(Command::Paid(rest.to_string())),
        "show" => Ok(Command::Show),
        "save" => Ok(Command::Submit { conduct: false }),
        "conduct" => Ok(Command::Submit { conduct: true }),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

pub fn render_view(picker: Picker, view: &ResultsView) -> String {
    match view {
        ResultsView::Closed => String::new(),
        ResultsView::NothingFound => format!("{picker}:\n  {NOTHING_FOUND}"),
        ResultsView::Rows(rows) => {
            let mut out = format!("{picker}:");
            for row in rows {
                out.push_str(&format!("\n  {}. {}", row.position + 1, row.label));
            }
            out
        }
    }
}

pub fn render_form<A: CrmApi>(form: &OrderForm<A>) -> String {
    let draft = form.draft();
    let mut out = String::new();
    for picker in Picker::ALL {
        if picker == Picker::Product {
            continue;
        }
        let label = form.selected_label(picker).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{picker}: {label}\n"));
    }

    if draft.lines().is_empty() {
        out.push_str("lines: none\n");
    } else {
        out.push_str("lines:\n");
        for (i, line) in draft.lines().lines().iter().enumerate() {
            out.push_str(&format!(
                "  {}. {}  {} x {} = {}\n",
                i + 1,
                line.display_name(),
                line.unit_price(),
                line.quantity(),
                line.line_sum()
            ));
        }
    }
    out.push_str(&format!(
        "total: {}  paid: {}",
        draft.total_sum().to_receipt_string(),
        draft.paid().to_receipt_string()
    ));
    out
}

fn line_error(index: usize, err: LineError) -> String {
    match err {
        LineError::OutOfRange { len, .. } => format!("no line {} (the order has {len})", index + 1),
        other => other.to_string(),
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Print(String),
    Quit,
}

pub async fn execute<A: CrmApi>(form: &mut OrderForm<A>, command: Command) -> Step {
    let out = match command {
        Command::Help => HELP.to_string(),
        Command::Quit => return Step::Quit,
        Command::Token(raw) => match form.authenticate(&raw).await {
            Ok(()) => "signed in".to_string(),
            Err(err) => err.to_string(),
        },
        Command::Load => match form.load_reference_data().await {
            Ok(report) if report.is_complete() => {
                let data = form.reference();
                format!(
                    "loaded {} organizations, {} warehouses, {} cash accounts, {} price types, {} products",
                    data.organizations.len(),
                    data.warehouses.len(),
                    data.payboxes.len(),
                    data.price_types.len(),
                    data.products.len()
                )
            }
            Ok(_) => "reference data partially loaded".to_string(),
            Err(err) => err.to_string(),
        },
        Command::List(picker) => {
            form.open(picker).await;
            render_view(picker, &form.view(picker))
        }
        Command::Find(picker, text) => {
            form.type_into(picker, &text).await;
            render_view(picker, &form.view(picker))
        }
        Command::Pick(picker, row) => match form.pick(picker, row) {
            Some(label) => format!("{picker}: {label}"),
            None => format!("no row {} in the {picker} list", row + 1),
        },
        Command::Edit(index, field, value) => match form.update_line(index, field, value) {
            Ok(line) => format!("{}. {} = {}", index + 1, line.display_name(), line.line_sum()),
            Err(err) => line_error(index, err),
        },
        Command::Remove(index) => match form.remove_line(index) {
            Ok(line) => format!("removed {}", line.display_name()),
            Err(err) => line_error(index, err),
        },
        Command::Paid(text) => {
            form.set_paid_text(&text);
            format!("paid: {}", form.draft().paid().to_receipt_string())
        }
        Command::Show => render_form(form),
        Command::Submit { conduct } => match form.submit(conduct).await {
            Ok(receipt) => {
                let ids: Vec<String> = receipt
                    .document_ids()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                format!("accepted, document ids: [{}]", ids.join(", "))
            }
            Err(err) => err.to_string(),
        },
    };

    let notices: Vec<String> = form.take_notices().iter().map(ToString::to_string).collect();
    if notices.is_empty() {
        Step::Print(out)
    } else {
        Step::Print(format!("{out}\n{}", notices.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_commands() {
        assert_eq!(parse("list org"), Ok(Command::List(Picker::Organization)));
        assert_eq!(
            parse("find customer  Anna Petrova "),
            Ok(Command::Find(Picker::Customer, "Anna Petrova".to_string()))
        );
        assert_eq!(
            parse("find product"),
            Ok(Command::Find(Picker::Product, String::new()))
        );
        assert_eq!(parse("pick cash 2"), Ok(Command::Pick(Picker::Paybox, 1)));
    }

    #[test]
    fn parses_line_edits() {
        assert_eq!(
            parse("qty 1 3"),
            Ok(Command::Edit(0, LineField::Quantity, Decimal::from(3)))
        );
        assert_eq!(
            parse("price 2 12,50"),
            Ok(Command::Edit(1, LineField::UnitPrice, Decimal::new(1250, 2)))
        );
        assert_eq!(parse("rm 1"), Ok(Command::Remove(0)));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse("   "), Err(CommandError::Empty));
        assert_eq!(parse("token"), Err(CommandError::MissingArgument("token")));
        assert_eq!(parse("rm 0"), Err(CommandError::InvalidNumber("0".to_string())));
        assert_eq!(parse("qty 1 lots"), Err(CommandError::InvalidNumber("lots".to_string())));
        assert_eq!(
            parse("pick shelf 1"),
            Err(CommandError::UnknownPicker(UnknownPicker("shelf".to_string())))
        );
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".to_string())));
    }

    #[test]
    fn renders_placeholder_and_rows() {
        assert_eq!(render_view(Picker::Product, &ResultsView::Closed), "");
        assert_eq!(
            render_view(Picker::Product, &ResultsView::NothingFound),
            "product:\n  Nothing found"
        );
    }
}
