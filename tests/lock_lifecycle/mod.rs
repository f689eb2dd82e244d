mod claim_release_test;
mod restart_test;
