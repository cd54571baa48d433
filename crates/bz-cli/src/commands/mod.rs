pub mod dispatch;
pub mod layers;
pub mod paths;
pub mod preprocess;
pub mod run;
