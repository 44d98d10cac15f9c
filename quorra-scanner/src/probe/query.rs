/// A URL split into its verbatim base and raw `&`-delimited query tokens.
///
/// Tokens are never decoded: a mutated URL carries the payload exactly as
/// written and the HTTP client encodes it on the way out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTarget<'a> {
    base: &'a str,
    tokens: Vec<&'a str>,
}

/// One `name=value` token and its position in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'a> {
    pub index: usize,
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> QueryTarget<'a> {
    /// `None` when the URL carries no `?`.
    pub fn parse(url: &'a str) -> Option<Self> {
        let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
        let (base, query) = without_fragment.split_once('?')?;

        Some(Self {
            base,
            tokens: query.split('&').collect(),
        })
    }

    /// Tokens with an `=`; the rest cannot be mutated and are skipped.
    pub fn params(&self) -> Vec<Param<'a>> {
        self.tokens
            .iter()
            .enumerate()
            .filter_map(|(index, token)| {
                token
                    .split_once('=')
                    .map(|(name, value)| Param { index, name, value })
            })
            .collect()
    }

    /// Rebuild the URL with the token at `index` set to `name=value`.
    pub fn with_value(&self, param: &Param<'_>, value: &str) -> String {
        let query = self
            .tokens
            .iter()
            .enumerate()
            .map(|(index, token)| {
                if index == param.index {
                    format!("{}={}", param.name, value)
                } else {
                    (*token).to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.base, query)
    }
}
