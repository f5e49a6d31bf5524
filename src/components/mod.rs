pub mod cosmic_background;
