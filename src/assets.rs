use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::{Index, IndexMut};

// ──────────────────────────────────────────────────────────────────────────────
// Asset Universe
// ──────────────────────────────────────────────────────────────────────────────

/// The closed set of asset classes the allocator works over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Asset {
    Equity,
    Bonds,
    Gold,
    Cash,
}

impl Asset {
    /// Canonical ordering. Every per-asset mapping is stored and reported in
    /// this order.
    pub const ALL: [Asset; 4] = [Asset::Equity, Asset::Bonds, Asset::Gold, Asset::Cash];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equity => "Equity",
            Self::Bonds => "Bonds",
            Self::Gold => "Gold",
            Self::Cash => "Cash",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Equity => 0,
            Self::Bonds => 1,
            Self::Gold => 2,
            Self::Cash => 3,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Fixed-Order Per-Asset Map
// ──────────────────────────────────────────────────────────────────────────────

/// Exactly one value per asset, in `Asset::ALL` order.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetMap<T>([T; 4]);

/// Forecast next-period return per asset. May be negative.
pub type PredictedReturns = AssetMap<f64>;

/// A risk tier's default allocation.
pub type BaselineWeights = AssetMap<f64>;

/// Normalized weights recommended for the next period.
pub type FinalPortfolio = AssetMap<f64>;

impl<T> AssetMap<T> {
    /// Values are given in `Asset::ALL` order.
    pub const fn new(values: [T; 4]) -> Self {
        Self(values)
    }

    pub fn from_fn(mut f: impl FnMut(Asset) -> T) -> Self {
        Self(Asset::ALL.map(&mut f))
    }

    pub fn try_from_fn<E>(mut f: impl FnMut(Asset) -> Result<T, E>) -> Result<Self, E> {
        let [a, b, c, d] = Asset::ALL;
        Ok(Self([f(a)?, f(b)?, f(c)?, f(d)?]))
    }

    pub fn get(&self, asset: Asset) -> &T {
        &self.0[asset.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Asset, &T)> {
        Asset::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(Asset, &T) -> U) -> AssetMap<U> {
        AssetMap::from_fn(|asset| f(asset, self.get(asset)))
    }
}

impl AssetMap<f64> {
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        self.sum() / self.0.len() as f64
    }

    /// Elementwise product with another map.
    pub fn weighted_by(&self, other: &AssetMap<f64>) -> AssetMap<f64> {
        self.map(|asset, v| v * other.get(asset))
    }

    /// Same value for every asset.
    pub fn uniform(value: f64) -> Self {
        Self([value; 4])
    }
}

impl<T> Index<Asset> for AssetMap<T> {
    type Output = T;

    fn index(&self, asset: Asset) -> &T {
        self.get(asset)
    }
}

impl<T> IndexMut<Asset> for AssetMap<T> {
    fn index_mut(&mut self, asset: Asset) -> &mut T {
        &mut self.0[asset.index()]
    }
}

/// Serializes as an object keyed by asset name, keys in canonical order.
impl<T: Serialize> Serialize for AssetMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (asset, value) in self.iter() {
            map.serialize_entry(asset.as_str(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_follows_canonical_order() {
        let map = AssetMap::from_fn(|a| a.as_str().len());
        let order: Vec<Asset> = map.iter().map(|(a, _)| a).collect();
        assert_eq!(order, Asset::ALL.to_vec());
        assert_eq!(map[Asset::Equity], 6);
        assert_eq!(map[Asset::Cash], 4);
    }

    #[test]
    fn test_try_from_fn_stops_at_first_error() {
        let mut visited = Vec::new();
        let result: Result<AssetMap<u8>, Asset> = AssetMap::try_from_fn(|a| {
            visited.push(a);
            if a == Asset::Gold { Err(a) } else { Ok(1) }
        });
        assert_eq!(result, Err(Asset::Gold));
        assert_eq!(visited, vec![Asset::Equity, Asset::Bonds, Asset::Gold]);
    }

    #[test]
    fn test_weighted_by_and_sum() {
        let returns = AssetMap::new([0.1, 0.2, -0.1, 0.0]);
        let weights = AssetMap::new([0.5, 0.5, 1.0, 1.0]);
        let raw = returns.weighted_by(&weights);
        assert!((raw.sum() - 0.05).abs() < 1e-12);
        assert!((returns.mean() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let map = AssetMap::new([0.25, 0.5, 0.125, 0.125]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Equity":0.25,"Bonds":0.5,"Gold":0.125,"Cash":0.125}"#);
    }
}
