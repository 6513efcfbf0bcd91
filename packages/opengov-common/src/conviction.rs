use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

/// Lock-period multipliers indexed by conviction, as configured on
/// Polkadot and Kusama.
pub const DEFAULT_CONVICTION_MULTIPLIERS: [u64; 7] = [0, 1, 2, 4, 8, 16, 32];

/// Voter-chosen conviction, trading vote weight for a longer lock.
#[cw_serde]
#[derive(Copy, Eq, Default)]
pub enum Conviction {
    #[default]
    None,
    Locked1x,
    Locked2x,
    Locked3x,
    Locked4x,
    Locked5x,
    Locked6x,
}

impl Conviction {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Conviction::None),
            1 => Some(Conviction::Locked1x),
            2 => Some(Conviction::Locked2x),
            3 => Some(Conviction::Locked3x),
            4 => Some(Conviction::Locked4x),
            5 => Some(Conviction::Locked5x),
            6 => Some(Conviction::Locked6x),
            _ => None,
        }
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Runtime variant name, used as the display tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Conviction::None => "None",
            Conviction::Locked1x => "Locked1x",
            Conviction::Locked2x => "Locked2x",
            Conviction::Locked3x => "Locked3x",
            Conviction::Locked4x => "Locked4x",
            Conviction::Locked5x => "Locked5x",
            Conviction::Locked6x => "Locked6x",
        }
    }

    /// Vote weight of `capital` at this conviction: a tenth for `None`,
    /// otherwise capital times the conviction level.
    pub fn votes(&self, capital: Uint128) -> Uint128 {
        match self {
            Conviction::None => Uint128::new(capital.u128() / 10),
            other => capital.saturating_mul(Uint128::from(other.index())),
        }
    }
}

/// Multiplier for `index`, or 0 when the table has no such entry.
pub fn lock_multiplier(multipliers: &[u64], index: u8) -> u64 {
    multipliers.get(index as usize).copied().unwrap_or(0)
}
