// src/query.rs
use crate::{
    error::{BatchError, Result},
    load::{RawTable, RawValue},
};
use serde::{Deserialize, Serialize};

/// A single address to be parsed by the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    pub address: String,
}

/// The whole batch, in input row order. Serializes as a bare JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressQueryList(pub Vec<AddressQuery>);

impl AddressQueryList {
    /// Validates every row; the first bad row fails the whole batch.
    pub fn from_table(table: &RawTable) -> Result<Self> {
        table
            .rows
            .iter()
            .enumerate()
            .map(|(i, value)| match value {
                RawValue::Text(s) => Ok(AddressQuery { address: s.clone() }),
                RawValue::Missing => Err(BatchError::schema(i + 1, "address is missing")),
                RawValue::NonText { kind, shown } => Err(BatchError::schema(
                    i + 1,
                    format!("address must be a string, got {kind} {shown}"),
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(AddressQueryList)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON request body: `[{"address": "..."}, ...]`.
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<RawValue>) -> RawTable {
        RawTable {
            rows,
            sources: Vec::new(),
        }
    }

    #[test]
    fn encodes_rows_in_order() -> anyhow::Result<()> {
        let t = table(vec![
            RawValue::Text("123 Main St".into()),
            RawValue::Text("456 Oak Ave".into()),
        ]);
        let list = AddressQueryList::from_table(&t)?;
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.to_payload()?,
            r#"[{"address":"123 Main St"},{"address":"456 Oak Ave"}]"#
        );
        Ok(())
    }

    #[test]
    fn escapes_quotes_and_unicode() -> anyhow::Result<()> {
        let t = table(vec![RawValue::Text("Straße 5 \"Hinterhaus\"".into())]);
        let payload = AddressQueryList::from_table(&t)?.to_payload()?;
        let back: Vec<AddressQuery> = serde_json::from_str(&payload)?;
        assert_eq!(back[0].address, "Straße 5 \"Hinterhaus\"");
        Ok(())
    }

    #[test]
    fn missing_value_fails_whole_batch() {
        let t = table(vec![RawValue::Text("123 Main St".into()), RawValue::Missing]);
        match AddressQueryList::from_table(&t) {
            Err(BatchError::SchemaValidation { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("missing"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn non_string_value_fails() {
        let t = table(vec![RawValue::NonText {
            kind: "number",
            shown: "42".into(),
        }]);
        let err = AddressQueryList::from_table(&t).unwrap_err();
        assert_eq!(
            err.to_string(),
            "row 1 is not a valid address query: address must be a string, got number 42"
        );
    }
}
