// 集成测试
use harmonogram::{ensure_supported_extension, get_num_from_ord, get_ord_from_num, get_ord_from_tuple, get_tuple_from_ord};

#[test]
pub fn test_ord_to_num(){
    assert!(get_num_from_ord("B3".as_bytes()).unwrap() == 2);
    assert!(get_num_from_ord("Z".as_bytes()).unwrap() == 26);
    assert!(get_num_from_ord("AB".as_bytes()).unwrap() == 28);

    assert!(get_ord_from_num(1).unwrap() == "A".to_string());
    assert!(get_ord_from_num(26).unwrap() == "Z".to_string());
    assert!(get_ord_from_num(27).unwrap() == "AA".to_string());
    assert!(get_ord_from_num(37).unwrap() == "AK".to_string());
    assert!(get_ord_from_num(0).is_err());

    assert!(get_tuple_from_ord("A1".as_bytes()).unwrap() == (1, 1));
    assert!(get_tuple_from_ord("B3".as_bytes()).unwrap() == (3, 2));
    assert!(get_tuple_from_ord("$AB$12".as_bytes()).unwrap() == (12, 28));
    assert!(get_tuple_from_ord("12".as_bytes()).is_err());
    assert!(get_ord_from_tuple(57, 3).unwrap() == "C57");
}

#[test]
pub fn test_supported_extensions(){
    assert!(ensure_supported_extension("plan.xlsx").is_ok());
    assert!(ensure_supported_extension("PLAN.XLSM").is_ok());
    assert!(ensure_supported_extension("plan.xls").is_err());
    assert!(ensure_supported_extension("plan.csv").is_err());
    assert!(ensure_supported_extension("plan").is_err());
}

#[test]
pub fn test_cell_value_get(){
    use harmonogram::{chrono::NaiveDate, CellValue};

    let date = NaiveDate::from_ymd_opt(2024, 9, 10).unwrap();
    assert!(CellValue::Date(45545.0).get::<NaiveDate>().unwrap() == Some(date));
    assert!(CellValue::from("2024/09/10").get::<NaiveDate>().unwrap() == Some(date));
    assert!(CellValue::from("--").get::<NaiveDate>().unwrap() == None);
    assert!(CellValue::from("jutro").get::<NaiveDate>().is_err());
    assert!(CellValue::Blank.get::<NaiveDate>().unwrap() == None);

    assert!(CellValue::Number(3.0).get::<String>().unwrap() == Some("3".to_string()));
    assert!(CellValue::Date(45545.0).get::<String>().unwrap() == Some("2024-09-10".to_string()));
    assert!(CellValue::Blank.get::<String>().unwrap() == Some(String::new()));
    assert!(CellValue::Blank.is_blank() && CellValue::from(" \n").is_blank());
    assert!(!CellValue::Number(0.0).is_blank());
}
