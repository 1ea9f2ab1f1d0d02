use anyhow::Result;

use spark_youth::page::PageAccess;

use super::{Services, render};

pub async fn run(svc: &Services) -> Result<()> {
    let (page, state) = svc.shell(PageAccess::Protected).await;
    if state.identity.is_some() && page.location.is_none() {
        println!("Spark Youth\n");
    }
    render::shell(&page);
    Ok(())
}
