use safar_domain::{PaxCounts, PriceTable, RoomType};

use crate::RoomingError;

/// Total price for the requested counts: `Σ count[type] × price_per_pax[type]`.
///
/// Amounts are whole-unit integers in a single currency; no rounding occurs.
/// Every room type with a non-zero count must have a price entry.
pub fn price_total(pax: &PaxCounts, table: &PriceTable) -> Result<i64, RoomingError> {
    let mut total: i64 = 0;

    for room_type in RoomType::ALL {
        let count = pax.count_for(room_type);
        if count == 0 {
            continue;
        }

        let per_pax = table
            .price_for(room_type)
            .ok_or(RoomingError::PriceMismatch(room_type))?;

        total += i64::from(count) * per_pax;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table() -> PriceTable {
        PriceTable::new()
            .with_price(RoomType::Quad, 25_000_000)
            .with_price(RoomType::Triple, 27_500_000)
            .with_price(RoomType::Double, 30_000_000)
            .with_price(RoomType::Single, 37_500_000)
    }

    #[test]
    fn test_quad_only_total() {
        let total = price_total(&PaxCounts::new(4, 0, 0, 0), &full_table()).unwrap();
        assert_eq!(total, 100_000_000);
    }

    #[test]
    fn test_mixed_total() {
        let total = price_total(&PaxCounts::new(4, 3, 2, 1), &full_table()).unwrap();
        // 4×25M + 3×27.5M + 2×30M + 1×37.5M
        assert_eq!(total, 100_000_000 + 82_500_000 + 60_000_000 + 37_500_000);
    }

    #[test]
    fn test_missing_price_entry() {
        let table = PriceTable::new().with_price(RoomType::Quad, 25_000_000);
        let result = price_total(&PaxCounts::new(2, 0, 1, 0), &table);
        assert_eq!(result.unwrap_err(), RoomingError::PriceMismatch(RoomType::Double));
    }

    #[test]
    fn test_unrequested_types_need_no_price() {
        let table = PriceTable::new().with_price(RoomType::Single, 37_500_000);
        let total = price_total(&PaxCounts::new(0, 0, 0, 2), &table).unwrap();
        assert_eq!(total, 75_000_000);
    }
}
