use super::SymbolUniverse;

/// Large-cap NSE listings in Yahoo notation.
const NSE_SYMBOLS: &[&str] = &[
    "RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "INFY.NS", "HINDUNILVR.NS",
    "ICICIBANK.NS", "KOTAKBANK.NS", "SBIN.NS", "BAJFINANCE.NS", "BHARTIARTL.NS",
    "ASIANPAINT.NS", "ITC.NS", "AXISBANK.NS", "LT.NS", "DMART.NS",
    "MARUTI.NS", "SUNPHARMA.NS", "TITAN.NS", "ULTRACEMCO.NS", "WIPRO.NS",
    "NESTLEIND.NS", "POWERGRID.NS", "NTPC.NS", "TATAMOTORS.NS", "HCLTECH.NS",
    "BAJAJFINSV.NS", "ONGC.NS", "M&M.NS", "TECHM.NS", "COALINDIA.NS",
    "ADANIGREEN.NS", "ADANIPORTS.NS", "TATASTEEL.NS", "JSWSTEEL.NS", "HINDALCO.NS",
    "INDUSINDBK.NS", "DRREDDY.NS", "CIPLA.NS", "GRASIM.NS", "BPCL.NS",
    "BRITANNIA.NS", "SHREECEM.NS", "DIVISLAB.NS", "EICHERMOT.NS", "APOLLOHOSP.NS",
    "HEROMOTOCO.NS", "BAJAJ-AUTO.NS", "UPL.NS", "TATACONSUM.NS", "ADANIENT.NS",
    "GODREJCP.NS", "PIDILITIND.NS", "DABUR.NS", "MARICO.NS", "COLPAL.NS",
    "BERGEPAINT.NS", "PAGEIND.NS", "BIOCON.NS", "LUPIN.NS", "CADILAHC.NS",
    "MOTHERSUMI.NS", "BOSCHLTD.NS", "ASHOKLEY.NS", "TVSMOTOR.NS", "BAJAJHLDNG.NS",
    "SIEMENS.NS", "HAVELLS.NS", "VOLTAS.NS", "CROMPTON.NS", "WHIRLPOOL.NS",
    "GODREJIND.NS", "CONCOR.NS", "IRCTC.NS", "SAIL.NS", "NMDC.NS",
    "VEDL.NS", "HINDZINC.NS", "NATIONALUM.NS", "MOIL.NS", "GMRINFRA.NS",
    "RPOWER.NS", "ADANIPOWER.NS", "TATAPOWER.NS", "TORNTPOWER.NS", "JSW.NS",
    "ACC.NS", "AMBUJACEM.NS", "RAMCOCEM.NS", "HEIDELBERG.NS", "JKCEMENT.NS",
    "BANKBARODA.NS", "CANBK.NS", "PNB.NS", "UNIONBANK.NS", "IDFCFIRSTB.NS",
    "FEDERALBNK.NS", "RBLBANK.NS", "BANDHANBNK.NS", "AUBANK.NS", "YESBANK.NS",
    "LICHSGFIN.NS", "SRTRANSFIN.NS", "CHOLA.NS", "PFC.NS", "RECLTD.NS",
    "HDFCAMC.NS", "MUTHOOTFIN.NS", "MANAPPURAM.NS", "IBULHSGFIN.NS", "DHFL.NS",
];

/// A fixed, ordered symbol list.
#[derive(Debug, Clone)]
pub struct StaticUniverse {
    symbols: Vec<String>,
}

impl StaticUniverse {
    /// The built-in NSE list.
    pub fn nse() -> Self {
        Self::from_symbols(NSE_SYMBOLS.iter().copied())
    }

    /// Build from any symbol list. Blank entries and repeats are dropped,
    /// first occurrence wins.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.into().trim().to_string();
            if !symbol.is_empty() && !out.contains(&symbol) {
                out.push(symbol);
            }
        }
        Self { symbols: out }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolUniverse for StaticUniverse {
    fn list_symbols(&self) -> Vec<String> {
        self.symbols.clone()
    }
}
