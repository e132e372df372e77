use crate::app::App;
use crate::error::Result;
use crate::models::Period;
use crate::settings::{load_settings, shellexpand_path};
use crate::view::{Page, ViewState};

fn period_opt(month: Option<u32>) -> Result<Period> {
    month.map_or(Ok(Period::Annual), Period::month)
}

/// Build the state a page command starts from. The month flag picks the
/// period on month-selector pages and the focus month on the quarterly one.
pub fn state_for(page: Page, month: Option<u32>) -> Result<ViewState> {
    with_month(ViewState::default().open(page), month)
}

fn with_month(state: ViewState, month: Option<u32>) -> Result<ViewState> {
    match (state.page(), month) {
        (Some(Page::DreTrimestral), Some(m)) => state.with_focus_month(m),
        (Some(p), m) if p.uses_period() => Ok(state.with_period(period_opt(m)?)),
        _ => Ok(state),
    }
}

/// Load the data once and print the page for `state`.
pub fn show(data_dir: Option<String>, state: ViewState) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    let app = App::load(settings)?;
    println!("{}", app.render(&state)?);
    Ok(())
}

pub fn page(data_dir: Option<String>, page: Page, month: Option<u32>) -> Result<()> {
    show(data_dir, state_for(page, month)?)
}

pub fn view(data_dir: Option<String>, name: &str, month: Option<u32>) -> Result<()> {
    let state = ViewState::default().navigate(name)?;
    show(data_dir, with_month(state, month)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DreError;

    #[test]
    fn test_state_for_period_pages() {
        let s = state_for(Page::DashboardGeral, Some(4)).unwrap();
        assert_eq!(s.period, Period::Month(4));
        assert_eq!(s.page(), Some(Page::DashboardGeral));
        let s = state_for(Page::AnaliseFaturamento, None).unwrap();
        assert_eq!(s.period, Period::Annual);
        assert!(matches!(
            state_for(Page::AnaliseFaturamento, Some(13)),
            Err(DreError::InvalidMonth(13))
        ));
    }

    #[test]
    fn test_state_for_quarterly_uses_focus_month() {
        let s = state_for(Page::DreTrimestral, Some(6)).unwrap();
        assert_eq!(s.focus_month, 6);
        assert_eq!(s.period, Period::Annual);
        assert!(matches!(
            state_for(Page::DreTrimestral, Some(12)),
            Err(DreError::InvalidMonth(12))
        ));
    }

    #[test]
    fn test_home_ignores_month() {
        let s = with_month(ViewState::default().navigate("Início").unwrap(), Some(3)).unwrap();
        assert_eq!(s.page(), None);
        assert_eq!(s.period, Period::Annual);
    }

    #[test]
    fn test_state_for_ignores_month_elsewhere() {
        let s = state_for(Page::DreCompleto, Some(3)).unwrap();
        assert_eq!(s.period, Period::Annual);
        assert_eq!(s.page(), Some(Page::DreCompleto));
    }
}
