mod entry;
mod logger;

use streambench::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
