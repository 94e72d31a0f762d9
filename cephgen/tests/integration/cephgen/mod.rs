mod openstack;
mod standalone;
