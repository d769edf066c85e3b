pub mod predict_close;
