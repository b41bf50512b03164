use crate::domain::fulfilment::PropertyFulfilment;
use crate::domain::portfolio::{ModuleHealth, PortfolioTotals};

#[derive(Debug)]
pub struct DashboardPageData {
    pub totals: PortfolioTotals,
    pub health: ModuleHealth,
    pub fulfilment: Vec<PropertyFulfilment>,
    pub year: i32,
    pub year_choices: Vec<i32>,
}
