// ==========================================
// 示例工作簿生成器
// ==========================================
// 用途: 生成含四张表（旧价格/旧BOM/新价格/新BOM）的示例 xlsx
// 输出: 命令行第一个参数，默认 tests/fixtures/sample_bom.xlsx
// ==========================================

use rust_xlsxwriter::{Format, Workbook, XlsxError};

const DEFAULT_OUTPUT: &str = "tests/fixtures/sample_bom.xlsx";

/// 单元格取值
enum Cell {
    Blank,
    Text(&'static str),
    Number(f64),
}

use Cell::{Blank, Number as N, Text as T};

struct SheetLayout {
    name: &'static str,
    /// 表头所在行（其上为标题/说明行）
    header_row: usize,
    rows: Vec<Vec<Cell>>,
}

fn sample() -> Vec<SheetLayout> {
    vec![
        SheetLayout {
            name: "旧价格",
            header_row: 2,
            rows: vec![
                vec![T("2024 年度平台化价格清单")],
                vec![Blank],
                vec![T("JPN"), T("Desc"), T("Price"), T("Vendor")],
                vec![T("R-0402-10K"), T("电阻"), N(0.012), T("甲")],
                vec![T("C-0603-1UF"), T("电容"), N(0.035), T("乙")],
                vec![T("L-1210-4R7"), T("电感"), N(0.42), T("甲")],
                vec![T("IC-MCU-32"), T("主控"), N(8.6), T("丙")],
            ],
        },
        SheetLayout {
            name: "旧BOM",
            header_row: 0,
            rows: vec![
                vec![T("JPN"), T("数量"), T("位号")],
                vec![T("R-0402-10K"), N(24.0), T("R1-R24")],
                vec![T("C-0603-1UF"), N(16.0), T("C1-C16")],
                vec![T("L-1210-4R7"), N(2.0), T("L1,L2")],
                vec![T("IC-MCU-32"), N(1.0), T("U1")],
            ],
        },
        SheetLayout {
            name: "新价格",
            header_row: 1,
            rows: vec![
                vec![Blank, T("2025 年度定点价格")],
                vec![Blank, T("Component"), T("单价"), T("币种")],
                vec![Blank, T("R-0402-10K"), N(0.010), T("CNY")],
                vec![Blank, T("C-0603-1UF"), N(0.038), T("CNY")],
                vec![Blank, T("IC-MCU-32"), N(7.9), T("CNY")],
                vec![Blank, T("D-SOD-123"), N(0.05), T("CNY")],
            ],
        },
        SheetLayout {
            name: "新BOM",
            header_row: 0,
            rows: vec![
                vec![T("Component"), T("数量")],
                vec![T("R-0402-10K"), N(20.0)],
                vec![T("C-0603-1UF"), N(18.0)],
                vec![T("IC-MCU-32"), N(1.0)],
                vec![T("D-SOD-123"), N(4.0)],
            ],
        },
    ]
}

fn write(path: &str, sheets: &[SheetLayout]) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;
        for (r, row) in sheet.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Blank => {}
                    Cell::Number(x) => {
                        worksheet.write_number(r, c, *x)?;
                    }
                    Cell::Text(s) if r as usize == sheet.header_row => {
                        worksheet.write_string_with_format(r, c, *s, &bold)?;
                    }
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, *s)?;
                    }
                }
            }
        }
    }

    workbook.save(path)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    println!("==========================================");
    println!("示例工作簿生成器");
    println!("==========================================");

    let sheets = sample();
    write(&output, &sheets)?;
    for sheet in &sheets {
        println!(
            "  {} : 表头第 {} 行，数据 {} 行",
            sheet.name,
            sheet.header_row + 1,
            sheet.rows.len() - sheet.header_row - 1
        );
    }
    println!("已生成: {}", output);
    Ok(())
}
