use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tractor_plough_core::Move;

const TRANSFER_DOMAIN: &str = "plough";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded route payload.
pub(crate) const TRANSFER_HEADER: &str = "plough:v1";
/// Delimiter used to separate the prefix, field dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Pilot route captured together with the field dimensions it was computed for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RouteSnapshot {
    /// Number of ploughable columns of the field the route was computed for.
    pub(crate) columns: u32,
    /// Number of ploughable rows of the field the route was computed for.
    pub(crate) rows: u32,
    /// Moves emitted by the pilot.
    pub(crate) moves: Vec<Move>,
}

impl RouteSnapshot {
    /// Encodes the route into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, RouteTransferError> {
        let payload = SerializableRoute {
            moves: self.moves.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(RouteTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{TRANSFER_HEADER}:{}x{}:{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a route from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, RouteTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RouteTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(RouteTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(RouteTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(RouteTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(RouteTransferError::MissingPayload)?;

        if domain != TRANSFER_DOMAIN {
            return Err(RouteTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != TRANSFER_VERSION {
            return Err(RouteTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(RouteTransferError::InvalidEncoding)?;
        let decoded: SerializableRoute =
            serde_json::from_slice(&bytes).map_err(RouteTransferError::InvalidPayload)?;

        Ok(Self {
            columns,
            rows,
            moves: decoded.moves,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableRoute {
    moves: Vec<Move>,
}

/// Errors that can occur while encoding or decoding route transfer strings.
#[derive(Debug, Error)]
pub(crate) enum RouteTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("route payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded route.
    #[error("route string is missing the prefix")]
    MissingPrefix,
    /// The encoded route did not contain a version segment.
    #[error("route string is missing the version")]
    MissingVersion,
    /// The encoded route did not include field dimensions.
    #[error("route string is missing the field dimensions")]
    MissingDimensions,
    /// The encoded route did not include the payload segment.
    #[error("route string is missing the payload")]
    MissingPayload,
    /// The encoded route used an unexpected prefix segment.
    #[error("route prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded route used an unsupported version identifier.
    #[error("route version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The field dimensions could not be parsed from the encoded route.
    #[error("could not parse field dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode route payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not process route payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), RouteTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| RouteTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| RouteTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| RouteTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(RouteTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tractor_plough_core::Direction;

    #[test]
    fn route_survives_transfer() {
        let snapshot = RouteSnapshot {
            columns: 20,
            rows: 15,
            moves: vec![
                Move::To { row: 0, column: 0 },
                Move::Step(Direction::East),
                Move::Partial {
                    row: Some(-4),
                    column: None,
                },
            ],
        };

        let encoded = snapshot.encode().expect("route encodes");
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:20x15:")));

        let decoded = RouteSnapshot::decode(&encoded).expect("route decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn decode_rejects_foreign_prefix() {
        let error = RouteSnapshot::decode("harrow:v1:3x3:e30").expect_err("foreign prefix");
        assert!(matches!(error, RouteTransferError::InvalidPrefix(prefix) if prefix == "harrow"));
    }

    #[test]
    fn decode_rejects_zero_dimensions() {
        let error = RouteSnapshot::decode("plough:v1:0x3:e30").expect_err("zero columns");
        assert!(matches!(error, RouteTransferError::InvalidDimensions(_)));
    }

    #[test]
    fn decode_rejects_truncated_strings() {
        assert!(matches!(
            RouteSnapshot::decode("   "),
            Err(RouteTransferError::EmptyPayload)
        ));
        assert!(matches!(
            RouteSnapshot::decode("plough:v1:3x3"),
            Err(RouteTransferError::MissingPayload)
        ));
        assert!(matches!(
            RouteSnapshot::decode("plough:v2:3x3:e30"),
            Err(RouteTransferError::UnsupportedVersion(_))
        ));
    }
}
