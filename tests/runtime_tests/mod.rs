mod timeout_test;
