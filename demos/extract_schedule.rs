use harmonogram::{export::read_schedule, read::XlsxBook, ScheduleLayout};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "xlsx/harmonogram.xlsx".to_string());

    let book = XlsxBook::new(&path)?;
    println!("visible sheets: {:?}, hidden sheets: {:?}", book.get_visible_sheets(), book.get_hidden_sheets());
    // None picks the sheet that was active when the workbook was saved
    let sheet = book.select_sheet(None)?;

    let events = read_schedule(&path, Some(&sheet), &ScheduleLayout::default())?;
    for e in &events {
        let remote = if e.is_remote { " (zdalnie)" } else { "" };
        println!("{} {} {}-{} {}{remote}", e.date, e.program, e.start_time.format("%H:%M"), e.end_time.format("%H:%M"), e.display_title());
    }
    println!("{} events in sheet {sheet}", events.len());
    Ok(())
}
