pub mod backdrop;
pub mod clock_banner;
pub mod report_panel;
pub mod search_bar;
pub mod weather_screen;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use backdrop::{BackdropLayer, BackdropProps, Palette};
pub use clock_banner::{ClockBanner, ClockBannerProps};
pub use report_panel::{ReportPanel, ReportPanelProps};
pub use search_bar::{SearchBar, SearchBarProps};
pub use weather_screen::{WeatherScreen, WeatherScreenProps};
