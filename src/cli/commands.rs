use thiserror::Error;
use tracing::debug;

use crate::config::{Config, ConfigError};
use crate::core::services::{ProductService, ProductUpdate, SettingsService, SummaryService};
use crate::core::{Clock, PeriodIndex};
use crate::errors::LedgerError;
use crate::ledger::{Ledger, YearMonth};
use crate::storage::{JsonStorage, StorageBackend};

use super::{io, output, report};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("{0}")]
    Usage(String),
}

/// One invocation of the command-line tool.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Summary(Option<YearMonth>),
    Months,
    Month(YearMonth),
    List,
    Add {
        name: String,
        total: f64,
        installments: u32,
    },
    Edit {
        number: usize,
        update: ProductUpdate,
    },
    Remove {
        number: usize,
        assume_yes: bool,
    },
    Anticipate {
        number: usize,
        count: u32,
        assume_yes: bool,
    },
    Profit(f64),
    Safe(f64),
    Help,
}

impl Command {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, CommandError> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let Some((&head, rest)) = args.split_first() else {
            return Ok(Command::Summary(None));
        };
        let (positional, flags) = split_flags(rest)?;
        if !matches!(head, "edit" | "remove" | "anticipate") {
            reject_flags(&flags)?;
        }
        let command = match head {
            "summary" => {
                let period = positional.first().map(|raw| parse_period(raw)).transpose()?;
                Command::Summary(period)
            }
            "months" => Command::Months,
            "month" => {
                let [year, month] = expect_args::<2>(&positional, "month <YYYY> <MM>")?;
                let year: i32 = parse_number(year, "year")?;
                let month: u32 = parse_number(month, "month")?;
                let period = YearMonth::new(year, month)
                    .ok_or_else(|| CommandError::Usage(format!("invalid month `{month}`")))?;
                Command::Month(period)
            }
            "list" => Command::List,
            "add" => {
                let [name, total, installments] =
                    expect_args::<3>(&positional, "add <name> <total> <installments>")?;
                Command::Add {
                    name: name.to_string(),
                    total: parse_amount(total)?,
                    installments: parse_number(installments, "installments")?,
                }
            }
            "edit" => {
                let [number] = expect_args::<1>(&positional, "edit <n> [--name N] [--total T] [--installments I]")?;
                let mut update = ProductUpdate::default();
                for (flag, value) in &flags {
                    let value = value.ok_or_else(|| {
                        CommandError::Usage(format!("flag `--{flag}` needs a value"))
                    })?;
                    match *flag {
                        "name" => update.name = Some(value.to_string()),
                        "total" => update.total_value = Some(parse_amount(value)?),
                        "installments" => {
                            update.installments = Some(parse_number(value, "installments")?)
                        }
                        other => {
                            return Err(CommandError::Usage(format!("unknown flag `--{other}`")))
                        }
                    }
                }
                if update.is_empty() {
                    return Err(CommandError::Usage(
                        "edit needs at least one of --name, --total, --installments".into(),
                    ));
                }
                Command::Edit {
                    number: parse_product_number(number)?,
                    update,
                }
            }
            "remove" => {
                let [number] = expect_args::<1>(&positional, "remove <n> [--yes]")?;
                Command::Remove {
                    number: parse_product_number(number)?,
                    assume_yes: has_yes(&flags)?,
                }
            }
            "anticipate" => {
                let [number, count] = expect_args::<2>(&positional, "anticipate <n> <count> [--yes]")?;
                Command::Anticipate {
                    number: parse_product_number(number)?,
                    count: parse_number(count, "count")?,
                    assume_yes: has_yes(&flags)?,
                }
            }
            "profit" => {
                let [value] = expect_args::<1>(&positional, "profit <value>")?;
                Command::Profit(parse_amount(value)?)
            }
            "safe" => {
                let [value] = expect_args::<1>(&positional, "safe <percentage>")?;
                Command::Safe(parse_amount(value)?)
            }
            "help" | "-h" | "--help" => Command::Help,
            other => return Err(CommandError::Usage(format!("unknown command `{other}`"))),
        };
        Ok(command)
    }

    fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Edit { .. }
                | Command::Remove { .. }
                | Command::Anticipate { .. }
                | Command::Profit(_)
                | Command::Safe(_)
        )
    }
}

/// Loaded state a command runs against.
pub struct App<'c> {
    pub ledger: Ledger,
    pub storage: JsonStorage,
    pub config: Config,
    pub clock: &'c dyn Clock,
}

impl<'c> App<'c> {
    /// Loads the ledger from `storage`; a fresh ledger takes the configured safe percentage.
    pub fn load(
        storage: JsonStorage,
        config: Config,
        clock: &'c dyn Clock,
    ) -> Result<Self, CommandError> {
        let fresh = !storage.path().exists();
        let mut ledger = storage.load()?;
        if fresh {
            ledger.settings.safe_percentage = config.default_safe_percentage;
            ledger.touch(clock.today());
        }
        Ok(Self {
            ledger,
            storage,
            config,
            clock,
        })
    }

    pub fn run(&mut self, command: Command) -> Result<(), CommandError> {
        debug!(?command, "running command");
        let mutates = command.mutates();
        let changed = self.dispatch(command)?;
        if mutates && changed {
            self.storage.save(&self.ledger)?;
        }
        Ok(())
    }

    /// Returns whether the ledger was modified.
    fn dispatch(&mut self, command: Command) -> Result<bool, CommandError> {
        let symbol = self.config.currency_symbol.clone();
        match command {
            Command::Summary(period) => {
                let period = period.unwrap_or_else(|| YearMonth::of(self.clock.today()));
                self.print_month(period, &symbol);
                Ok(false)
            }
            Command::Months => {
                let index = PeriodIndex::build(&self.ledger.products);
                output::section("MONTHS WITH INSTALLMENTS");
                if index.is_empty() {
                    output::info("No products registered.");
                } else {
                    print!("{}", report::render_periods(&index));
                }
                Ok(false)
            }
            Command::Month(period) => {
                let index = PeriodIndex::build(&self.ledger.products);
                let rows = SummaryService::period_products(&self.ledger, &index, period);
                output::section(format!(
                    "PRODUCTS OF {}/{}",
                    period.month_name(),
                    period.year
                ));
                if rows.is_empty() {
                    output::info(format!("No products found for {period}."));
                } else {
                    print!("{}", report::render_active_products(&rows, &symbol));
                }
                Ok(false)
            }
            Command::List => {
                output::section("PRODUCTS");
                if self.ledger.is_empty() {
                    output::info("No products registered.");
                } else {
                    print!("{}", report::render_product_list(&self.ledger, &symbol));
                }
                Ok(false)
            }
            Command::Add {
                name,
                total,
                installments,
            } => {
                let idx = ProductService::add(&mut self.ledger, &name, total, installments, self.clock)?;
                let parcel = self.ledger.products[idx].parcel;
                output::success(format!(
                    "Product #{} added! Monthly parcel: {}",
                    idx + 1,
                    report::money(&symbol, parcel)
                ));
                Ok(true)
            }
            Command::Edit { number, update } => {
                let idx = self.index_of(number)?;
                let product = ProductService::edit(&mut self.ledger, idx, update)?;
                output::success(format!(
                    "Product updated: {} ({} x {})",
                    product.name,
                    report::money(&symbol, product.parcel),
                    product.installments
                ));
                Ok(true)
            }
            Command::Remove { number, assume_yes } => {
                let idx = self.index_of(number)?;
                let name = self
                    .ledger
                    .product(idx)
                    .map(|product| product.name.clone())
                    .ok_or(LedgerError::ProductNotFound {
                        number,
                        count: self.ledger.product_count(),
                    })?;
                if !io::confirm_action(&format!("Remove '{name}'?"), assume_yes)? {
                    output::info("Operation cancelled.");
                    return Ok(false);
                }
                ProductService::remove(&mut self.ledger, idx)?;
                output::success("Product removed!");
                Ok(true)
            }
            Command::Anticipate {
                number,
                count,
                assume_yes,
            } => {
                let idx = self.index_of(number)?;
                let today = self.clock.today();
                let quote = ProductService::anticipation_quote(&self.ledger, idx, count, today)?;
                output::info(report::render_quote(&quote, &symbol));
                if !io::confirm_action("Confirm the anticipation?", assume_yes)? {
                    output::info("Operation cancelled.");
                    return Ok(false);
                }
                ProductService::anticipate(&mut self.ledger, idx, count, today)?;
                output::success("Installments anticipated!");
                Ok(true)
            }
            Command::Profit(profit) => {
                SettingsService::set_monthly_profit(&mut self.ledger, profit, self.clock.today())?;
                output::success(format!(
                    "Monthly profit updated to {}",
                    report::money(&symbol, profit)
                ));
                Ok(true)
            }
            Command::Safe(percentage) => {
                SettingsService::set_safe_percentage(&mut self.ledger, percentage)?;
                output::success(format!("Safe percentage updated to {percentage:.0}%"));
                Ok(true)
            }
            Command::Help => {
                println!("{}", usage());
                Ok(false)
            }
        }
    }

    /// 0-based position for a 1-based product number.
    fn index_of(&self, number: usize) -> Result<usize, CommandError> {
        number.checked_sub(1).ok_or_else(|| {
            CommandError::from(LedgerError::ProductNotFound {
                number,
                count: self.ledger.product_count(),
            })
        })
    }

    fn print_month(&self, period: YearMonth, symbol: &str) {
        let summary = SummaryService::month_summary(&self.ledger, period);
        output::section(report::month_title(period));
        let headline = report::render_month_summary(&summary, symbol);
        if summary.evaluation.within_safe_threshold {
            print!("{headline}");
        } else {
            output::warning(headline.trim_end());
        }
        if summary.is_empty() {
            output::info(format!("No active products for {period}."));
        } else {
            output::section("ACTIVE PRODUCTS THIS MONTH");
            print!("{}", report::render_active_products(&summary.entries, symbol));
        }
    }
}

pub fn usage() -> &'static str {
    "Usage: spending_checker <command>\n\
     Commands:\n  \
     summary [YYYY-MM]                     month summary (default: current month)\n  \
     months                                years and months with installments\n  \
     month <YYYY> <MM>                     products charged in a month\n  \
     list                                  all products with their numbers\n  \
     add <name> <total> <installments>     register a purchase dated today\n  \
     edit <n> [--name N] [--total T] [--installments I]\n  \
     remove <n> [--yes]                    delete product number n\n  \
     anticipate <n> <count> [--yes]        pay installments ahead of time\n  \
     profit <value>                        set the monthly profit\n  \
     safe <percentage>                     set the safe percentage"
}

type Flags<'a> = Vec<(&'a str, Option<&'a str>)>;

fn split_flags<'a>(args: &[&'a str]) -> Result<(Vec<&'a str>, Flags<'a>), CommandError> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if let Some(flag) = arg.strip_prefix("--") {
            if flag.is_empty() {
                return Err(CommandError::Usage("empty flag `--`".into()));
            }
            if flag == "yes" {
                flags.push((flag, None));
            } else {
                flags.push((flag, iter.next()));
            }
        } else if arg == "-y" {
            flags.push(("yes", None));
        } else {
            positional.push(arg);
        }
    }
    Ok((positional, flags))
}

fn reject_flags(flags: &Flags<'_>) -> Result<(), CommandError> {
    match flags.first() {
        Some((flag, _)) => Err(CommandError::Usage(format!("unknown flag `--{flag}`"))),
        None => Ok(()),
    }
}

fn has_yes(flags: &Flags<'_>) -> Result<bool, CommandError> {
    let mut yes = false;
    for (flag, _) in flags {
        if *flag == "yes" {
            yes = true;
        } else {
            return Err(CommandError::Usage(format!("unknown flag `--{flag}`")));
        }
    }
    Ok(yes)
}

fn expect_args<'a, const N: usize>(
    positional: &[&'a str],
    usage: &str,
) -> Result<[&'a str; N], CommandError> {
    <[&str; N]>::try_from(positional).map_err(|_| CommandError::Usage(format!("usage: {usage}")))
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::Usage(format!("invalid amount `{raw}`")))
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::Usage(format!("invalid {what} `{raw}`")))
}

fn parse_product_number(raw: &str) -> Result<usize, CommandError> {
    match parse_number::<usize>(raw, "product number")? {
        0 => Err(CommandError::Usage("product numbers start at 1".into())),
        number => Ok(number),
    }
}

fn parse_period(raw: &str) -> Result<YearMonth, CommandError> {
    YearMonth::parse(raw).ok_or_else(|| CommandError::Usage(format!("invalid period `{raw}`")))
}
