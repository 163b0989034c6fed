mod common;
mod device;
mod onboarding;
