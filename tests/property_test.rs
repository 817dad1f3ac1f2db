// ==========================================
// 性质测试 (proptest)
// ==========================================
// 测试目标: 定位器行数/表头跨度、连接行数上下界、整理不改变行集合
// ==========================================

use bom_reconcile::domain::types::{DuplicateHeaderPolicy, FillPolicy};
use bom_reconcile::domain::{CellValue, RawGrid, Table};
use bom_reconcile::engine::{finalize, join, locate, FinalizeOptions, JoinOptions, LabeledTable};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn keyed_table(keys: &BTreeSet<u8>, column: &str) -> Table {
    Table::new(
        vec!["Component".into(), column.into()],
        keys.iter()
            .map(|k| {
                vec![
                    CellValue::text(format!("K{}", k)),
                    CellValue::Number(f64::from(*k)),
                ]
            })
            .collect(),
    )
}

proptest! {
    #[test]
    fn locator_extracts_rows_below_anchor(
        height in 1usize..12,
        width in 1usize..8,
        anchor_row_seed in 0usize..100,
        anchor_col_seed in 0usize..100,
        header_len_seed in 0usize..100,
    ) {
        let anchor_row = anchor_row_seed % height;
        let anchor_col = anchor_col_seed % width;
        let header_len = 1 + header_len_seed % (width - anchor_col);

        let mut grid = RawGrid::new(vec![vec![CellValue::Number(1.0); width]; height]);
        for c in 0..width {
            grid.set(anchor_row, c, CellValue::Empty);
        }
        grid.set(anchor_row, anchor_col, CellValue::text("JPN"));
        for i in 1..header_len {
            grid.set(anchor_row, anchor_col + i, CellValue::text(format!("H{}", i)));
        }

        let table = locate(&grid, "JPN", DuplicateHeaderPolicy::Disambiguate).unwrap();
        prop_assert_eq!(table.row_count(), height - anchor_row - 1);
        prop_assert_eq!(table.column_count(), header_len);
        prop_assert_eq!(table.columns()[0].as_str(), "JPN");
    }

    #[test]
    fn inner_join_bounded_by_smaller_side(
        left in prop::collection::btree_set(0u8..40, 0..20),
        right in prop::collection::btree_set(0u8..40, 0..20),
    ) {
        let l = keyed_table(&left, "单价");
        let r = keyed_table(&right, "数量");
        let joined = join(
            LabeledTable::new("价格", &l),
            LabeledTable::new("BOM", &r),
            "Component",
            &JoinOptions::inner(),
        ).unwrap();
        prop_assert!(joined.row_count() <= left.len().min(right.len()));
        prop_assert_eq!(joined.row_count(), left.intersection(&right).count());
    }

    #[test]
    fn outer_join_keeps_every_key_once(
        left in prop::collection::btree_set(0u8..40, 0..20),
        right in prop::collection::btree_set(0u8..40, 0..20),
    ) {
        let l = keyed_table(&left, "数量");
        let r = keyed_table(&right, "数量");
        let joined = join(
            LabeledTable::new("新表", &l),
            LabeledTable::new("旧表", &r),
            "Component",
            &JoinOptions::outer(),
        ).unwrap();
        prop_assert!(joined.row_count() >= left.len().max(right.len()));

        let keys = joined.column("Component").unwrap();
        let unique: BTreeSet<String> = keys.iter().map(|k| k.to_string()).collect();
        prop_assert_eq!(unique.len(), keys.len());
        prop_assert_eq!(unique.len(), left.union(&right).count());
    }

    #[test]
    fn finalize_preserves_row_multiset(
        values in prop::collection::vec(prop::option::of(-50i32..50), 0..30),
    ) {
        let rows: Vec<Vec<CellValue>> = values
            .iter()
            .map(|v| vec![v.map_or(CellValue::Empty, |x| CellValue::Number(f64::from(x)))])
            .collect();
        let table = Table::new(vec!["Component".into()], rows);
        let out = finalize(&table, &FinalizeOptions::sorted_by("Component", FillPolicy::NumericOnly));
        prop_assert_eq!(out.row_count(), table.row_count());

        let mut expected: Vec<i32> = values.iter().map(|v| v.unwrap_or(0)).collect();
        let mut actual: Vec<i32> = out
            .column("Component")
            .unwrap()
            .iter()
            .map(|c| c.as_number().unwrap_or(f64::NAN) as i32)
            .collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
    }
}
