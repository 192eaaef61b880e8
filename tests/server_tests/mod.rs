mod tcp_test;
