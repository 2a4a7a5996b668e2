mod application;
mod presentation {
    pub mod cli;
}

fn main() -> bvol_core::Result<()> {
    application::run()
}
