//! # Command Loop
//!
//! The interactive grammar and its dispatch onto [`crate::commands`].
//!
//! Each input line is split on whitespace and parsed by clap in multicall
//! mode, so the first word is the command name and `help` works out of the
//! box.
//!
//! ```text
//! flow> start
//! flow> add p1 2
//! flow> add p3 1 no onions
//! flow> discount 1.00
//! flow> pay cash 555-1234 Jane Doe
//! flow> summary --method cash
//! ```

use clap::{Parser, Subcommand};
use flow_core::{CustomerInfo, Money, PaymentMethod};
use tracing::debug;

use crate::commands::{history, order, product};
use crate::error::ApiError;
use crate::render;
use crate::state::{CatalogState, ConfigState, DbState, OrderState};

// =============================================================================
// Grammar
// =============================================================================

/// One line of terminal input.
#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum ReplCommand {
    /// Start a new order (an unfinished one is discarded)
    Start {
        /// Staff id the order is created by (defaults to FLOW_STAFF_ID)
        #[arg(long)]
        staff: Option<String>,
    },
    /// Add a product to the order
    Add {
        /// Product id, as listed by `products`
        product: String,
        #[arg(default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
        /// Free-text notes for the kitchen or counter
        #[arg(trailing_var_arg = true, num_args = 1..)]
        notes: Vec<String>,
    },
    /// Set the quantity of a line (0 removes it)
    Qty {
        /// Line id or its first characters
        item: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line from the order
    #[command(alias = "rm")]
    Remove {
        /// Line id or its first characters
        item: String,
    },
    /// Set the order discount, e.g. `discount 1.50`
    Discount {
        #[arg(allow_negative_numbers = true)]
        amount: Money,
    },
    /// Pay for the order: pay <method> [phone name...]
    Pay {
        /// cash, card, upi, wallet or split
        method: PaymentMethod,
        /// Customer phone number, e.g. 555-1234 or +1(555)1234
        #[arg(value_parser = parse_phone)]
        phone: Option<String>,
        /// Customer name
        #[arg(trailing_var_arg = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Cancel the order without saving it
    Cancel,
    /// Show the current order
    Show,
    /// List products, optionally matching a name
    Products { query: Option<String> },
    /// List stored orders, most recent first
    History {
        #[arg(short, long)]
        method: Option<PaymentMethod>,
    },
    /// Sales totals by payment method
    Summary {
        #[arg(short, long)]
        method: Option<PaymentMethod>,
    },
    /// Delete the stored order history
    ClearHistory,
    /// Leave the terminal
    #[command(alias = "exit")]
    Quit,
}

/// Accepts digits with the usual separators so that a name typed in the
/// phone position is reported instead of being stored as a number.
fn parse_phone(raw: &str) -> Result<String, String> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.');
    if raw.chars().all(allowed) && raw.chars().any(|c| c.is_ascii_digit()) {
        Ok(raw.to_string())
    } else {
        Err("expected a phone number such as 555-1234".to_string())
    }
}

/// What the loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Print(Vec<String>),
    Quit,
}

// =============================================================================
// Terminal
// =============================================================================

/// Owns the session state and runs commands against it.
#[derive(Debug, Clone)]
pub struct Terminal {
    pub orders: OrderState,
    pub catalog: CatalogState,
    pub db: DbState,
    pub config: ConfigState,
}

impl Terminal {
    pub fn new(catalog: CatalogState, db: DbState, config: ConfigState) -> Self {
        Terminal {
            orders: OrderState::new(),
            catalog,
            db,
            config,
        }
    }

    /// Parses and runs one input line. Parse and command errors become
    /// printable lines; they never end the session.
    pub async fn handle_line(&self, line: &str) -> Reply {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Reply::Print(Vec::new());
        }

        let parsed = match ReplLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => return Reply::Print(vec![e.to_string().trim_end().to_string()]),
        };

        match self.execute(parsed.command).await {
            Ok(reply) => reply,
            Err(e) => {
                debug!(code = e.code.as_str(), "Command failed");
                Reply::Print(vec![format!("✗ {}", e)])
            }
        }
    }

    /// Runs one parsed command.
    pub async fn execute(&self, command: ReplCommand) -> Result<Reply, ApiError> {
        let config = &self.config;

        let lines = match command {
            ReplCommand::Start { staff } => {
                let started = order::start_order(&self.orders, config, staff.as_deref())?;
                let mut out = render::notices(&started.notices);
                out.extend(render::order(config, &started.order));
                out
            }
            ReplCommand::Add {
                product,
                quantity,
                notes,
            } => {
                let notes = Some(notes.join(" ")).filter(|n| !n.is_empty());
                let added =
                    order::add_item(&self.orders, &self.catalog, &product, quantity, notes)?;
                self.with_order(added)
            }
            ReplCommand::Qty { item, quantity } => {
                let updated = order::update_quantity(&self.orders, &item, quantity)?;
                self.with_order(updated)
            }
            ReplCommand::Remove { item } => {
                let removed = order::remove_item(&self.orders, &item)?;
                let mut out = render::notices(&removed.notices);
                if removed.removed.is_none() {
                    out.push(format!("No line matches '{}'", item));
                }
                if let Some(snapshot) = &removed.order {
                    out.extend(render::order(config, snapshot));
                }
                out
            }
            ReplCommand::Discount { amount } => {
                let discounted = order::apply_discount(&self.orders, amount)?;
                self.with_order(discounted)
            }
            ReplCommand::Pay {
                method,
                phone,
                name,
            } => {
                let customer = phone.map(|phone| CustomerInfo::new(name.join(" "), phone));
                let paid =
                    order::complete_order(&self.orders, &self.db, config, method, customer).await?;
                render::checkout(config, &paid)
            }
            ReplCommand::Cancel => {
                let canceled = order::cancel_order(&self.orders);
                match canceled.canceled {
                    Some(_) => render::notices(&canceled.notices),
                    None => vec!["No order to cancel".to_string()],
                }
            }
            ReplCommand::Show => self.with_order(order::get_order(&self.orders)),
            ReplCommand::Products { query } => {
                render::products(config, &product::list_products(&self.catalog, query.as_deref()))
            }
            ReplCommand::History { method } => {
                render::history(config, &history::list_history(&self.db, method).await?)
            }
            ReplCommand::Summary { method } => {
                render::summary(config, &history::payment_summary(&self.db, method).await?)
            }
            ReplCommand::ClearHistory => {
                if history::clear_history(&self.db).await? {
                    vec!["Order history cleared".to_string()]
                } else {
                    vec!["Order history was already empty".to_string()]
                }
            }
            ReplCommand::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Print(lines))
    }

    fn with_order(&self, response: order::OrderResponse) -> Vec<String> {
        let mut out = render::notices(&response.notices);
        match &response.order {
            Some(snapshot) => out.extend(render::order(&self.config, snapshot)),
            None => out.push("No active order, use `start`".to_string()),
        }
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
