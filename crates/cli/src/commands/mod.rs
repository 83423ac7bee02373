pub mod doctor;
pub mod onboard;
pub mod run;
pub mod serve;
pub mod status;
