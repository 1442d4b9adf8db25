// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// Errors raised while decoding a SLIM payload.
///
/// None of these are fatal: the caller drops the affected payload (or the
/// rest of it) and carries on with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("need {required} bytes, got {available}")]
    TooShort { required: usize, available: usize },

    #[error("unknown fish tag protocol id {0}")]
    UnknownProtocol(u8),

    #[error("position cache full ({capacity} buoys), buoy {serial_id} not stored")]
    CacheFull { serial_id: u16, capacity: usize },
}

/// Borrow the first `required` bytes of `bytes`, or fail with `TooShort`.
pub(crate) fn require(bytes: &[u8], required: usize) -> Result<&[u8], DecodeError> {
    bytes.get(..required).ok_or(DecodeError::TooShort {
        required,
        available: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_checks_length() {
        assert_eq!(require(&[1, 2, 3], 2), Ok(&[1u8, 2][..]));
        assert_eq!(
            require(&[1, 2, 3], 4),
            Err(DecodeError::TooShort {
                required: 4,
                available: 3
            })
        );
    }

    #[test]
    fn messages_are_readable() {
        assert_eq!(
            DecodeError::UnknownProtocol(9).to_string(),
            "unknown fish tag protocol id 9"
        );
        assert_eq!(
            DecodeError::TooShort {
                required: 6,
                available: 2
            }
            .to_string(),
            "need 6 bytes, got 2"
        );
    }
}
