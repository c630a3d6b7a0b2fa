//! Compact binary encoding of protocol payloads.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::{InitialRequest, InstallResponse, SetupReply};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to encode {message}: {source}")]
    Encode {
        message: &'static str,
        #[source]
        source: bincode::Error,
    },
    #[error("failed to decode {message}: {source}")]
    Decode {
        message: &'static str,
        #[source]
        source: bincode::Error,
    },
}

fn encode<T: Serialize>(message: &'static str, value: &T) -> Result<Vec<u8>, ProtocolError> {
    bincode::serialize(value).map_err(|source| ProtocolError::Encode { message, source })
}

fn decode<T: DeserializeOwned>(message: &'static str, bytes: &[u8]) -> Result<T, ProtocolError> {
    bincode::deserialize(bytes).map_err(|source| ProtocolError::Decode { message, source })
}

macro_rules! impl_codec {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
                    encode(stringify!($name), self)
                }

                pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
                    decode(stringify!($name), bytes)
                }
            }
        )*
    };
}

impl_codec!(InitialRequest, SetupReply, InstallResponse);
