use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::traits::InstructionStream;
use crate::domain::{Error, Instruction, money};

pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Result<Self, Error> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Ok(Self { reader: Some(rdr) })
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "type")]
    kind: String,
    account: Option<u64>,
    amount: Option<Decimal>,
    option: Option<u64>,
    bet: Option<u64>,
    outcome: Option<String>,
}

fn require<T>(value: Option<T>, kind: &str, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::Ingestion(format!("{kind} instruction missing {field}")))
}

fn amount(value: Option<Decimal>, kind: &str) -> Result<Decimal, Error> {
    let raw = require(value, kind, "amount")?;
    if !money::is_canonical(raw) {
        return Err(Error::Ingestion(format!(
            "{kind} amount {raw} exceeds currency precision"
        )));
    }
    Ok(raw)
}

impl TryFrom<CsvRow> for Instruction {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let kind = row.kind.trim().to_ascii_lowercase();
        match kind.as_str() {
            "open" => Ok(Instruction::OpenAccount {
                account_id: require(row.account, &kind, "account")?,
                initial_balance: amount(row.amount.or(Some(Decimal::ZERO)), &kind)?,
            }),
            "deposit" => Ok(Instruction::Deposit {
                account_id: require(row.account, &kind, "account")?,
                amount: amount(row.amount, &kind)?,
            }),
            "withdraw" => Ok(Instruction::Withdraw {
                account_id: require(row.account, &kind, "account")?,
                amount: amount(row.amount, &kind)?,
            }),
            "place" => Ok(Instruction::PlaceBet {
                account_id: require(row.account, &kind, "account")?,
                option_id: require(row.option, &kind, "option")?,
                stake: amount(row.amount, &kind)?,
            }),
            "settle" => Ok(Instruction::SettleBet {
                bet_id: require(row.bet, &kind, "bet")?,
                outcome: require(row.outcome, &kind, "outcome")?.parse()?,
            }),
            other => Err(Error::Ingestion(format!(
                "invalid instruction type: {other}"
            ))),
        }
    }
}

impl<R: Read + Send + 'static> InstructionStream for CsvReader<R> {
    type Feed = Pin<Box<dyn Stream<Item = Result<Instruction, Error>> + Send>>;

    fn stream(&mut self) -> Self::Feed {
        // Take ownership of the reader so the iterator we build owns all
        // data and is 'static.
        let reader = match self.reader.take() {
            Some(r) => r,
            None => {
                // Already consumed; return an empty stream.
                return Box::pin(stream::iter(Vec::<Result<Instruction, Error>>::new()));
            }
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => Instruction::try_from(row),
                Err(e) => Err(Error::Ingestion(format!("CSV deserialization error: {e}"))),
            });

        Box::pin(stream::iter(iter))
    }
}
