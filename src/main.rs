use pathtrek::app::App;

const DEFAULT_ROWS: i32 = 21;
const DEFAULT_COLS: i32 = 31;

fn main() -> std::io::Result<()> {
    // The TUI owns stdout, so logs go to a file instead.
    let file_appender = tracing_appender::rolling::never(".", "pathtrek.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let mut args = std::env::args().skip(1);
    let rows = args
        .next()
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(DEFAULT_ROWS);
    let cols = args
        .next()
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(DEFAULT_COLS);

    let app = App::default();
    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout, rows, cols);
    App::restore_terminal(&mut stdout)?;
    result
}
