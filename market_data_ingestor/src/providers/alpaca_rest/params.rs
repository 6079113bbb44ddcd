use serde::{Deserialize, Serialize};

use crate::{
    models::{
        request_params::{BarsRequestParams, ProviderParams},
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Specifies the corporate action adjustment for stock data.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    #[default]
    Raw,
    Split,
    Dividend,
    All,
}

/// Specifies the source feed for stock data.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    #[default]
    Sip,
    Iex,
    Otc,
}

/// Alpaca-specific parameters for a bars request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AlpacaBarsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Adjustment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Feed>,
}

/// Checks a timeframe against the combinations the Alpaca bars endpoint accepts.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<(), ProviderError> {
    let amount = timeframe.amount;
    let message = match timeframe.unit {
        TimeFrameUnit::Minute if !(1..=59).contains(&amount) => {
            "Minute units can only be used with amounts between 1-59."
        }
        TimeFrameUnit::Hour if !(1..=23).contains(&amount) => {
            "Hour units can only be used with amounts 1-23"
        }
        TimeFrameUnit::Day | TimeFrameUnit::Week if amount != 1 => {
            "Day and Week units can only be used with amount 1"
        }
        TimeFrameUnit::Month if ![1, 2, 3, 6, 12].contains(&amount) => {
            "Month units can only be used with amount 1, 2, 3, 6 and 12"
        }
        _ => return Ok(()),
    };
    ValidationSnafu {
        message: format!("{timeframe}: {message}"),
    }
    .fail()
}

/// Alpaca's spelling of a timeframe, e.g. `15Min`, `1Day`, `3Month`.
pub fn timeframe_param(timeframe: &TimeFrame) -> String {
    let unit = match timeframe.unit {
        TimeFrameUnit::Minute => "Min",
        TimeFrameUnit::Hour => "Hour",
        TimeFrameUnit::Day => "Day",
        TimeFrameUnit::Week => "Week",
        TimeFrameUnit::Month => "Month",
    };
    format!("{}{unit}", timeframe.amount)
}

/// Rejects requests the stocks endpoint cannot serve.
pub fn validate_request(params: &BarsRequestParams) -> Result<(), ProviderError> {
    if let Err(message) = params.check() {
        return ValidationSnafu { message }.fail();
    }
    validate_timeframe(&params.timeframe)
}

fn snake_case<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Builds the query string pairs for one page of a bars request.
pub fn construct_params(params: &BarsRequestParams) -> Vec<(String, String)> {
    let mut query = vec![
        ("symbols".to_string(), params.symbols.join(",")),
        ("timeframe".to_string(), timeframe_param(&params.timeframe)),
        ("start".to_string(), params.start.to_rfc3339()),
        ("end".to_string(), params.end.to_rfc3339()),
    ];

    if let ProviderParams::Alpaca(alpaca) = &params.provider_specific {
        if let Some(adjustment) = alpaca.adjustment.as_ref().and_then(snake_case) {
            query.push(("adjustment".to_string(), adjustment));
        }
        if let Some(feed) = alpaca.feed.as_ref().and_then(snake_case) {
            query.push(("feed".to_string(), feed));
        }
    }

    query
}
