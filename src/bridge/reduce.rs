//! Reduction of server-streamed responses into one result.

use futures::StreamExt;

use crate::Error;
use crate::error::Result;
use crate::transport::ResponseStream;
use crate::types::ConsistencyToken;

/// Admitted outputs of a stream plus the token of the first admitted
/// element that carried one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reduced<T> {
    pub items: Vec<T>,
    pub token: Option<ConsistencyToken>,
}

/// Drains `stream`, keeping the elements `admit` accepts, mapped through
/// `map` into an output and the element's token.
///
/// Non-admitted elements are dropped silently. The first error ends the
/// reduction and discards everything collected so far.
pub(crate) async fn reduce_stream<E, T, A, M>(
    mut stream: ResponseStream<E>,
    admit: A,
    map: M,
) -> Result<Reduced<T>>
where
    A: Fn(&E) -> bool,
    M: Fn(E) -> (T, Option<ConsistencyToken>),
{
    let mut items = Vec::new();
    let mut token: Option<ConsistencyToken> = None;

    while let Some(element) = stream.next().await {
        let element = element.map_err(Error::mid_stream)?;
        if !admit(&element) {
            continue;
        }
        let (item, element_token) = map(element);
        if token.is_none() {
            token = element_token.filter(|t| !t.is_empty());
        }
        items.push(item);
    }

    Ok(Reduced { items, token })
}
