use anyhow::Result;
use gamefetch::Job;

fn main() -> Result<()> {
    gamefetch::run(Job::Igdb)
}
